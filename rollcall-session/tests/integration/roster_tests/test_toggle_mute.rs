use rollcall_core::{ConferenceEvent, ParticipantMetadata, RosterUpdate};
use rollcall_session::ConferencingService;

use crate::integration::create_active_session;

#[tokio::test]
async fn test_toggle_mute_alternates() {
    let (service, session) = create_active_session().await;

    service
        .emit(ConferenceEvent::ParticipantJoined {
            participant_id: "u1".into(),
            metadata: ParticipantMetadata::default(),
        })
        .await;
    assert!(session.output.wait_for_updates(1, 2000).await);

    let first = session.handle.toggle_mute("u1").await.expect("toggle");
    assert!(first);
    assert!(service.is_user_muted(&"u1".into()));

    let second = session.handle.toggle_mute("u1").await.expect("toggle");
    assert!(!second);
    assert!(!service.is_user_muted(&"u1".into()));

    let muted_rows: Vec<bool> = session
        .output
        .updates()
        .await
        .into_iter()
        .filter_map(|u| match u {
            RosterUpdate::RowRefreshed { row, .. } => Some(row.muted),
            _ => None,
        })
        .collect();
    assert_eq!(muted_rows, vec![true, false]);
}

#[tokio::test]
async fn test_position_controls_reach_service() {
    let (service, session) = create_active_session().await;

    service
        .emit(ConferenceEvent::ParticipantJoined {
            participant_id: "u1".into(),
            metadata: ParticipantMetadata::default(),
        })
        .await;
    assert!(session.output.wait_for_updates(1, 2000).await);

    session.handle.set_angle("u1", 0.4).await.expect("angle");
    session.handle.set_distance("u1", 0.8).await.expect("distance");
    session.handle.flip_camera().await.expect("flip");
    session.handle.switch_speaker().await.expect("speaker");
    // Round trip through the command queue so the commands above are applied.
    session.handle.toggle_mute("u1").await.expect("toggle");

    let position = service.user_position(&"u1".into());
    assert_eq!((position.angle, position.distance), (0.4, 0.8));
    assert_eq!(service.camera_flips(), 1);
    assert_eq!(service.speaker_switches(), 1);
}
