use rollcall_core::{ConferenceEvent, MediaStream, RosterUpdate, Surface};

use crate::integration::create_active_session;

#[tokio::test]
async fn test_second_screen_share_replaces_first() {
    let (service, session) = create_active_session().await;
    let first = MediaStream::new();
    let second = MediaStream::new();

    service
        .emit(ConferenceEvent::ScreenShareAdded {
            participant_id: "u1".into(),
            stream: first.clone(),
        })
        .await;
    service
        .emit(ConferenceEvent::ScreenShareAdded {
            participant_id: "u2".into(),
            stream: second.clone(),
        })
        .await;
    assert!(session.output.wait_for_updates(3, 2000).await);

    assert_eq!(
        session.output.updates().await,
        vec![
            RosterUpdate::StreamAttached {
                surface: Surface::ScreenShare,
                stream: first,
            },
            RosterUpdate::StreamDetached {
                surface: Surface::ScreenShare,
            },
            RosterUpdate::StreamAttached {
                surface: Surface::ScreenShare,
                stream: second.clone(),
            },
        ]
    );
    assert_eq!(service.attached(&Surface::ScreenShare), Some(second));

    service
        .emit(ConferenceEvent::ScreenShareRemoved {
            participant_id: "u2".into(),
        })
        .await;
    assert!(session.output.wait_for_updates(4, 2000).await);
    assert_eq!(service.attached(&Surface::ScreenShare), None);
}

#[tokio::test]
async fn test_hang_up_detaches_screen_share() {
    let (service, session) = create_active_session().await;

    service
        .emit(ConferenceEvent::ScreenShareAdded {
            participant_id: "u1".into(),
            stream: MediaStream::new(),
        })
        .await;
    assert!(session.output.wait_for_updates(1, 2000).await);

    session.handle.hang_up().await.expect("hang up");
    session.task.await.expect("session task").expect("session result");

    assert_eq!(
        session.output.updates().await.last(),
        Some(&RosterUpdate::StreamDetached {
            surface: Surface::ScreenShare,
        })
    );
    assert_eq!(service.attached(&Surface::ScreenShare), None);
}
