use std::sync::Arc;

use rollcall_core::{ConferenceEvent, ConferenceTarget, ParticipantMetadata, SessionState};
use rollcall_session::{
    ConferenceSession, FilePreferences, LAST_CONFERENCE_ID_KEY, LoopbackService, PreferenceStore,
    SessionConfig,
};

use crate::integration::{LOCAL_ID, init_tracing};
use crate::utils::{MockAvatarFetcher, RecordingOutput};

#[tokio::test]
async fn test_zero_capacities_still_run() {
    init_tracing();

    let config = SessionConfig {
        command_capacity: 0,
        event_capacity: 0,
        ..SessionConfig::default()
    };
    let service = Arc::new(LoopbackService::new(LOCAL_ID));
    let output = RecordingOutput::new();
    let (session, handle) = ConferenceSession::new(
        &config,
        ConferenceTarget::CreateDemo,
        service.clone(),
        Arc::new(output.clone()),
    );
    let task = tokio::spawn(
        session
            .with_avatar_fetcher(Arc::new(MockAvatarFetcher::new()))
            .run(),
    );
    assert!(output.wait_for_state(SessionState::Active, 2000).await);

    service
        .emit(ConferenceEvent::ParticipantJoined {
            participant_id: "u1".into(),
            metadata: ParticipantMetadata::default(),
        })
        .await;
    assert!(output.wait_for_updates(1, 2000).await);

    handle.hang_up().await.expect("hang up");
    task.await.expect("session task").expect("session result");
}

#[tokio::test]
async fn test_join_remembers_conference_in_file() {
    init_tracing();

    let dir = std::env::temp_dir().join(format!("rollcall-{}", uuid::Uuid::new_v4()));
    let path = dir.join("prefs.json");
    let config = SessionConfig {
        preferences_path: path.clone(),
        ..SessionConfig::default()
    };
    let service = Arc::new(LoopbackService::new(LOCAL_ID));
    let output = RecordingOutput::new();
    let (session, handle) = ConferenceSession::new(
        &config,
        ConferenceTarget::Join("retro".into()),
        service,
        Arc::new(output.clone()),
    );
    let task = tokio::spawn(
        session
            .with_avatar_fetcher(Arc::new(MockAvatarFetcher::new()))
            .run(),
    );
    assert!(output.wait_for_state(SessionState::Active, 2000).await);

    let stored = FilePreferences::new(&path).get(LAST_CONFERENCE_ID_KEY).unwrap();
    assert_eq!(stored.as_deref(), Some("retro"));

    handle.hang_up().await.expect("hang up");
    task.await.expect("session task").expect("session result");
    let _ = std::fs::remove_dir_all(dir);
}
