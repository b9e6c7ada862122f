use crate::error::Result;
use rollcall_core::{ParticipantId, RowSlot};
use tokio::sync::oneshot;

/// Requests from the presentation layer to a running session.
#[derive(Debug)]
pub enum SessionCommand {
    /// Leave the conference and close the session.
    HangUp,

    SendMessage {
        text: String,
        reply: oneshot::Sender<Result<()>>,
    },

    /// Invert the service's mute state for a user; replies with the new state.
    ToggleMute {
        participant_id: ParticipantId,
        reply: oneshot::Sender<bool>,
    },

    SetAngle {
        participant_id: ParticipantId,
        angle: f64,
    },

    SetDistance {
        participant_id: ParticipantId,
        distance: f64,
    },

    FlipCamera,

    SwitchSpeaker,

    /// A row slot now renders this participant.
    RowShown {
        slot: RowSlot,
        participant_id: ParticipantId,
    },

    /// A row slot went off screen.
    RowHidden { slot: RowSlot },
}
