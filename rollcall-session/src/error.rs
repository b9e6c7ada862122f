use rollcall_core::{ParticipantId, SessionState};
use thiserror::Error;

/// Failure reported by the conferencing service. The service gives no
/// structure beyond a message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ServiceError(pub String);

impl ServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("conferencing service failed to {operation}: {source}")]
    Service {
        operation: &'static str,
        #[source]
        source: ServiceError,
    },

    #[error("avatar fetch failed: {0}")]
    Network(String),

    #[error("participant {0} is not in the roster")]
    NotFound(ParticipantId),

    #[error("session cannot move from {from} to {to}")]
    InvalidTransition { from: SessionState, to: SessionState },

    #[error("session is closed")]
    SessionClosed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("preferences file is malformed: {0}")]
    PreferencesFormat(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid configuration: {field} must be at least 1")]
    InvalidConfig { field: &'static str },
}

impl SessionError {
    pub fn service(operation: &'static str, source: ServiceError) -> Self {
        Self::Service { operation, source }
    }
}

impl From<rollcall_core::InvalidTransition> for SessionError {
    fn from(e: rollcall_core::InvalidTransition) -> Self {
        Self::InvalidTransition {
            from: e.from,
            to: e.to,
        }
    }
}

impl From<reqwest::Error> for SessionError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e.to_string())
    }
}

pub type Result<T, E = SessionError> = std::result::Result<T, E>;
