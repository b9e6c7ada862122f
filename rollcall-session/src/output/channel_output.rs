use crate::output::presentation_output::PresentationOutput;
use async_trait::async_trait;
use bytes::Bytes;
use rollcall_core::{ConferenceId, ParticipantId, RosterUpdate, RowSlot, SessionState};
use tokio::sync::mpsc;
use tracing::warn;

/// One item of the presentation feed.
#[derive(Debug, Clone, PartialEq)]
pub enum PresentationEvent {
    Update(RosterUpdate),
    State(SessionState),
    Joined(ConferenceId),
    Avatar {
        slot: RowSlot,
        participant_id: ParticipantId,
        avatar: Bytes,
    },
}

/// Forwards everything a session emits onto an unbounded channel.
#[derive(Clone)]
pub struct ChannelOutput {
    tx: mpsc::UnboundedSender<PresentationEvent>,
}

impl ChannelOutput {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PresentationEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn forward(&self, event: PresentationEvent) {
        if let Err(e) = self.tx.send(event) {
            warn!("Presentation feed closed, dropping {:?}", e.0);
        }
    }
}

#[async_trait]
impl PresentationOutput for ChannelOutput {
    async fn apply(&self, update: RosterUpdate) {
        self.forward(PresentationEvent::Update(update));
    }

    async fn session_state_changed(&self, state: SessionState) {
        self.forward(PresentationEvent::State(state));
    }

    async fn conference_joined(&self, conference_id: ConferenceId) {
        self.forward(PresentationEvent::Joined(conference_id));
    }

    async fn avatar_loaded(&self, slot: RowSlot, participant_id: ParticipantId, avatar: Bytes) {
        self.forward(PresentationEvent::Avatar {
            slot,
            participant_id,
            avatar,
        });
    }
}
