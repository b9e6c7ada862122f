use crate::model::participant::{ParticipantId, ParticipantMetadata};
use crate::model::stream::MediaStream;
use serde::{Deserialize, Serialize};

/// Delegate callbacks of the conferencing service, delivered as messages.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "op", content = "d")]
pub enum ConferenceEvent {
    ParticipantJoined {
        participant_id: ParticipantId,
        metadata: ParticipantMetadata,
    },
    ParticipantLeft {
        participant_id: ParticipantId,
    },
    MessageReceived {
        participant_id: ParticipantId,
        text: String,
    },
    StreamAdded {
        participant_id: ParticipantId,
        stream: MediaStream,
    },
    StreamRemoved {
        participant_id: ParticipantId,
    },
    ScreenShareAdded {
        participant_id: ParticipantId,
        stream: MediaStream,
    },
    ScreenShareRemoved {
        participant_id: ParticipantId,
    },
}
