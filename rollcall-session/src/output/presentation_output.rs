use async_trait::async_trait;
use bytes::Bytes;
use rollcall_core::{ConferenceId, ParticipantId, RosterUpdate, RowSlot, SessionState};

/// Trait the presentation layer implements so a session can drive the
/// rendered list. Calls arrive in the order the session produced them.
#[async_trait]
pub trait PresentationOutput: Send + Sync {
    /// Apply one list or media instruction.
    async fn apply(&self, update: RosterUpdate);

    async fn session_state_changed(&self, state: SessionState);

    /// The service accepted the join; `conference_id` is the one in use.
    async fn conference_joined(&self, conference_id: ConferenceId);

    /// An avatar finished downloading for a row that is still bound to it.
    async fn avatar_loaded(&self, slot: RowSlot, participant_id: ParticipantId, avatar: Bytes);
}
