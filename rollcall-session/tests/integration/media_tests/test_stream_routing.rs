use rollcall_core::{
    ConferenceEvent, MediaStream, ParticipantId, ParticipantMetadata, RosterUpdate, RowSlot,
    Surface,
};

use crate::integration::{LOCAL_ID, command_barrier, create_active_session};

fn row(id: &str) -> Surface {
    Surface::Row(ParticipantId::from(id))
}

#[tokio::test]
async fn test_local_stream_goes_to_self_view() {
    let (service, session) = create_active_session().await;
    let stream = MediaStream::new();

    service
        .emit(ConferenceEvent::StreamAdded {
            participant_id: LOCAL_ID.into(),
            stream: stream.clone(),
        })
        .await;
    assert!(session.output.wait_for_updates(1, 2000).await);

    assert_eq!(
        session.output.updates().await,
        vec![RosterUpdate::StreamAttached {
            surface: Surface::SelfView,
            stream: stream.clone(),
        }]
    );
    assert_eq!(service.attached(&Surface::SelfView), Some(stream));

    service
        .emit(ConferenceEvent::StreamRemoved {
            participant_id: LOCAL_ID.into(),
        })
        .await;
    assert!(session.output.wait_for_updates(2, 2000).await);
    assert_eq!(service.attached(&Surface::SelfView), None);
}

#[tokio::test]
async fn test_stream_for_visible_row_attaches_immediately() {
    let (service, session) = create_active_session().await;

    service
        .emit(ConferenceEvent::ParticipantJoined {
            participant_id: "u1".into(),
            metadata: ParticipantMetadata::default(),
        })
        .await;
    assert!(session.output.wait_for_updates(1, 2000).await);

    session.handle.row_shown(RowSlot(0), "u1").await.expect("row shown");
    command_barrier(&session.handle).await;

    let stream = MediaStream::new();
    service
        .emit(ConferenceEvent::StreamAdded {
            participant_id: "u1".into(),
            stream: stream.clone(),
        })
        .await;
    assert!(session.output.wait_for_updates(3, 2000).await);

    let updates = session.output.updates().await;
    assert_eq!(
        updates[1],
        RosterUpdate::StreamAttached {
            surface: row("u1"),
            stream: stream.clone(),
        }
    );
    assert!(matches!(
        &updates[2],
        RosterUpdate::RowRefreshed { index: 0, row } if row.video_visible
    ));
    assert_eq!(service.attached(&row("u1")), Some(stream));

    service
        .emit(ConferenceEvent::StreamRemoved {
            participant_id: "u1".into(),
        })
        .await;
    assert!(session.output.wait_for_updates(5, 2000).await);
    assert_eq!(service.attached(&row("u1")), None);
}

#[tokio::test]
async fn test_stream_for_offscreen_row_waits_until_shown() {
    let (service, session) = create_active_session().await;
    let stream = MediaStream::new();

    service
        .emit(ConferenceEvent::ParticipantJoined {
            participant_id: "u1".into(),
            metadata: ParticipantMetadata::default(),
        })
        .await;
    service
        .emit(ConferenceEvent::StreamAdded {
            participant_id: "u1".into(),
            stream: stream.clone(),
        })
        .await;
    assert!(session.output.wait_for_updates(2, 2000).await);

    assert!(
        !session
            .output
            .updates()
            .await
            .iter()
            .any(|u| matches!(u, RosterUpdate::StreamAttached { .. }))
    );
    assert_eq!(service.attached(&row("u1")), None);

    session.handle.row_shown(RowSlot(3), "u1").await.expect("row shown");
    assert!(session.output.wait_for_updates(3, 2000).await);
    assert_eq!(
        session.output.updates().await[2],
        RosterUpdate::StreamAttached {
            surface: row("u1"),
            stream: stream.clone(),
        }
    );
    assert_eq!(service.attached(&row("u1")), Some(stream.clone()));

    // Scrolling away detaches, scrolling back reattaches the same stream.
    session.handle.row_hidden(RowSlot(3)).await.expect("row hidden");
    assert!(session.output.wait_for_updates(4, 2000).await);
    assert_eq!(service.attached(&row("u1")), None);

    session.handle.row_shown(RowSlot(1), "u1").await.expect("row shown");
    assert!(session.output.wait_for_updates(5, 2000).await);
    assert_eq!(service.attached(&row("u1")), Some(stream));
}

#[tokio::test]
async fn test_recycled_slot_moves_stream_to_new_participant() {
    let (service, session) = create_active_session().await;
    let first = MediaStream::new();
    let second = MediaStream::new();

    for (id, stream) in [("u1", &first), ("u2", &second)] {
        service
            .emit(ConferenceEvent::ParticipantJoined {
                participant_id: id.into(),
                metadata: ParticipantMetadata::default(),
            })
            .await;
        service
            .emit(ConferenceEvent::StreamAdded {
                participant_id: id.into(),
                stream: stream.clone(),
            })
            .await;
    }
    assert!(session.output.wait_for_updates(4, 2000).await);

    session.handle.row_shown(RowSlot(0), "u1").await.expect("row shown");
    session.handle.row_shown(RowSlot(0), "u2").await.expect("row shown");
    command_barrier(&session.handle).await;

    assert_eq!(service.attached(&row("u1")), None);
    assert_eq!(service.attached(&row("u2")), Some(second));
}
