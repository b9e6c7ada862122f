use crate::error::{Result, SessionError};
use crate::session::session_command::SessionCommand;
use rollcall_core::{ParticipantId, RowSlot};
use tokio::sync::{mpsc, oneshot};

/// Cloneable front for a running [`ConferenceSession`](crate::ConferenceSession).
/// Dropping every handle hangs up.
#[derive(Clone, Debug)]
pub struct SessionHandle {
    command_tx: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<SessionCommand>) -> Self {
        Self { command_tx }
    }

    pub async fn hang_up(&self) -> Result<()> {
        self.send(SessionCommand::HangUp).await
    }

    /// Broadcasts `text` and waits for the service's answer.
    pub async fn send_message(&self, text: impl Into<String>) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.send(SessionCommand::SendMessage {
            text: text.into(),
            reply,
        })
        .await?;
        rx.await.map_err(|_| SessionError::SessionClosed)?
    }

    pub async fn toggle_mute(&self, participant_id: impl Into<ParticipantId>) -> Result<bool> {
        let (reply, rx) = oneshot::channel();
        self.send(SessionCommand::ToggleMute {
            participant_id: participant_id.into(),
            reply,
        })
        .await?;
        rx.await.map_err(|_| SessionError::SessionClosed)
    }

    pub async fn set_angle(&self, participant_id: impl Into<ParticipantId>, angle: f64) -> Result<()> {
        self.send(SessionCommand::SetAngle {
            participant_id: participant_id.into(),
            angle,
        })
        .await
    }

    pub async fn set_distance(
        &self,
        participant_id: impl Into<ParticipantId>,
        distance: f64,
    ) -> Result<()> {
        self.send(SessionCommand::SetDistance {
            participant_id: participant_id.into(),
            distance,
        })
        .await
    }

    pub async fn flip_camera(&self) -> Result<()> {
        self.send(SessionCommand::FlipCamera).await
    }

    pub async fn switch_speaker(&self) -> Result<()> {
        self.send(SessionCommand::SwitchSpeaker).await
    }

    pub async fn row_shown(&self, slot: RowSlot, participant_id: impl Into<ParticipantId>) -> Result<()> {
        self.send(SessionCommand::RowShown {
            slot,
            participant_id: participant_id.into(),
        })
        .await
    }

    pub async fn row_hidden(&self, slot: RowSlot) -> Result<()> {
        self.send(SessionCommand::RowHidden { slot }).await
    }

    pub fn is_closed(&self) -> bool {
        self.command_tx.is_closed()
    }

    async fn send(&self, command: SessionCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| SessionError::SessionClosed)
    }
}
