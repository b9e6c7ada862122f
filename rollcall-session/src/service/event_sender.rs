use rollcall_core::ConferenceEvent;
use tokio::sync::mpsc;
use tracing::warn;

/// Producer side of a session's event queue, handed to the conferencing
/// service on subscribe.
#[derive(Clone, Debug)]
pub struct EventSender {
    tx: mpsc::Sender<ConferenceEvent>,
}

impl EventSender {
    pub fn new(tx: mpsc::Sender<ConferenceEvent>) -> Self {
        Self { tx }
    }

    /// Queue an event, waiting for room. Returns false once the session is gone.
    pub async fn deliver(&self, event: ConferenceEvent) -> bool {
        match self.tx.send(event).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Session event queue closed, dropping {:?}", e.0);
                false
            }
        }
    }

    /// Queue an event from a non-async callback.
    pub fn try_deliver(&self, event: ConferenceEvent) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(event)) => {
                warn!("Session event queue full, dropping {:?}", event);
                false
            }
            Err(mpsc::error::TrySendError::Closed(event)) => {
                warn!("Session event queue closed, dropping {:?}", event);
                false
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
