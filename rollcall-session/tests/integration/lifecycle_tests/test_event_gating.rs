use std::sync::Arc;

use rollcall_core::{
    ConferenceEvent, ConferenceTarget, ParticipantMetadata, RosterUpdate, SessionState,
};
use rollcall_session::{LoopbackService, PresentationEvent};
use tokio::sync::Notify;

use crate::integration::{LOCAL_ID, create_test_session, init_tracing};
use crate::utils::MockAvatarFetcher;

#[tokio::test]
async fn test_event_queued_while_joining_applies_after_active() {
    init_tracing();

    let gate = Arc::new(Notify::new());
    let service = Arc::new(LoopbackService::new(LOCAL_ID).with_join_gate(gate.clone()));
    let session = create_test_session(
        service.clone(),
        ConferenceTarget::Join("standup".into()),
        Arc::new(MockAvatarFetcher::new()),
    );
    assert!(session.output.wait_for_state(SessionState::Joining, 2000).await);

    let delivered = service
        .emit(ConferenceEvent::ParticipantJoined {
            participant_id: "early".into(),
            metadata: ParticipantMetadata::default(),
        })
        .await;
    assert!(delivered);
    assert!(session.output.updates().await.is_empty());

    gate.notify_one();
    assert!(session.output.wait_for_updates(1, 2000).await);

    let events = session.output.events().await;
    let active = events
        .iter()
        .position(|e| *e == PresentationEvent::State(SessionState::Active))
        .expect("session became active");
    let inserted = events
        .iter()
        .position(|e| matches!(e, PresentationEvent::Update(RosterUpdate::RowInserted { .. })))
        .expect("early participant inserted");
    assert!(active < inserted);
}

#[tokio::test]
async fn test_event_queued_while_leaving_is_not_applied() {
    init_tracing();

    let service = Arc::new(LoopbackService::new(LOCAL_ID).with_leave_events(vec![
        ConferenceEvent::ParticipantJoined {
            participant_id: "late".into(),
            metadata: ParticipantMetadata::named("Late"),
        },
    ]));
    let session = create_test_session(
        service.clone(),
        ConferenceTarget::Join("standup".into()),
        Arc::new(MockAvatarFetcher::new()),
    );
    assert!(session.output.wait_for_state(SessionState::Active, 2000).await);

    session.handle.hang_up().await.expect("hang up");
    session.task.await.expect("session task").expect("session result");

    assert_eq!(service.leave_calls(), 1);
    assert!(
        !session
            .output
            .updates()
            .await
            .iter()
            .any(|u| matches!(u, RosterUpdate::RowInserted { .. }))
    );
    assert_eq!(
        session.output.states().await.last(),
        Some(&SessionState::Closed)
    );
}
