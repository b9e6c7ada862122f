use crate::model::participant::{Participant, ParticipantId};
use crate::model::stream::{MediaStream, Surface};
use bytes::Bytes;

/// A recyclable row instance owned by the presentation layer.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct RowSlot(pub usize);

/// Everything a rendered row needs.
#[derive(Debug, Clone, PartialEq)]
pub struct RowViewModel {
    pub participant_id: ParticipantId,
    pub label: String,
    pub avatar: Option<Bytes>,
    pub muted: bool,
    pub angle: f64,
    pub distance: f64,
    pub video_visible: bool,
}

impl RowViewModel {
    pub fn from_participant(participant: &Participant, avatar: Option<Bytes>) -> Self {
        Self {
            participant_id: participant.id.clone(),
            label: participant.label().to_owned(),
            avatar,
            muted: participant.is_muted,
            angle: participant.position.angle,
            distance: participant.position.distance,
            video_visible: participant.has_active_video,
        }
    }
}

/// Instruction for the rendered list. Inserts and refreshes carry the row's
/// index after the change; removals carry the index the row occupied.
#[derive(Debug, Clone, PartialEq)]
pub enum RosterUpdate {
    RowInserted { index: usize, row: RowViewModel },
    RowRemoved { index: usize, participant_id: ParticipantId },
    RowRefreshed { index: usize, row: RowViewModel },
    StreamAttached { surface: Surface, stream: MediaStream },
    StreamDetached { surface: Surface },
    MessageChanged { text: String },
}
