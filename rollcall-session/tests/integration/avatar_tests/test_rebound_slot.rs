use bytes::Bytes;
use rollcall_core::{ConferenceEvent, ParticipantId, ParticipantMetadata, RosterUpdate, RowSlot};
use rollcall_session::PresentationEvent;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

use crate::integration::{command_barrier, create_active_session_with};
use crate::utils::MockAvatarFetcher;

const U1_AVATAR: &str = "https://avatars.test/u1.png";
const U2_AVATAR: &str = "https://avatars.test/u2.png";

fn with_avatar(url: &str) -> ParticipantMetadata {
    ParticipantMetadata {
        avatar_url: Some(url.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_rebound_slot_only_shows_latest_avatar() {
    let gate = Arc::new(Notify::new());
    let fetcher = Arc::new(
        MockAvatarFetcher::new()
            .with_avatar(U1_AVATAR, b"u1-png")
            .with_gate(U1_AVATAR, gate.clone())
            .with_avatar(U2_AVATAR, b"u2-png"),
    );
    let (service, session) = create_active_session_with(fetcher).await;

    for (id, url) in [("u1", U1_AVATAR), ("u2", U2_AVATAR)] {
        service
            .emit(ConferenceEvent::ParticipantJoined {
                participant_id: id.into(),
                metadata: with_avatar(url),
            })
            .await;
    }
    assert!(session.output.wait_for_updates(2, 2000).await);

    session.handle.row_shown(RowSlot(0), "u1").await.expect("row shown");
    session.handle.row_shown(RowSlot(0), "u2").await.expect("row shown");
    assert!(
        session
            .output
            .wait_for(2000, |events| events
                .iter()
                .any(|e| matches!(e, PresentationEvent::Avatar { .. })))
            .await
    );

    // Release the first download. Its binding is gone, so it must not land.
    gate.notify_waiters();
    tokio::time::sleep(Duration::from_millis(100)).await;
    command_barrier(&session.handle).await;

    assert_eq!(
        session.output.avatars().await,
        vec![(
            RowSlot(0),
            ParticipantId::from("u2"),
            Bytes::from_static(b"u2-png")
        )]
    );
}

#[tokio::test]
async fn test_avatar_for_departed_participant_is_dropped() {
    let gate = Arc::new(Notify::new());
    let fetcher = Arc::new(
        MockAvatarFetcher::new()
            .with_avatar(U1_AVATAR, b"u1-png")
            .with_gate(U1_AVATAR, gate.clone()),
    );
    let (service, session) = create_active_session_with(fetcher).await;

    service
        .emit(ConferenceEvent::ParticipantJoined {
            participant_id: "u1".into(),
            metadata: with_avatar(U1_AVATAR),
        })
        .await;
    assert!(session.output.wait_for_updates(1, 2000).await);

    session.handle.row_shown(RowSlot(0), "u1").await.expect("row shown");
    command_barrier(&session.handle).await;

    service
        .emit(ConferenceEvent::ParticipantLeft {
            participant_id: "u1".into(),
        })
        .await;
    assert!(
        session
            .output
            .wait_for(2000, |events| events.iter().any(|e| matches!(
                e,
                PresentationEvent::Update(RosterUpdate::RowRemoved { .. })
            )))
            .await
    );

    // notify_one keeps a permit, so this releases the fetch even if it has not polled yet.
    gate.notify_one();
    tokio::time::sleep(Duration::from_millis(100)).await;
    command_barrier(&session.handle).await;

    assert!(session.output.avatars().await.is_empty());
}
