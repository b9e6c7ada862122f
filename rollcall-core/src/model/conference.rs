use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq)]
pub struct ConferenceId(pub String);

impl From<&str> for ConferenceId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for ConferenceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ConferenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a session does when it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConferenceTarget {
    /// Join an existing conference by alias.
    Join(ConferenceId),
    /// Ask the service for a fresh demo conference.
    CreateDemo,
}

/// Result of a demo/create request: server-assigned id and alias.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DemoConference {
    pub id: ConferenceId,
    pub alias: ConferenceId,
}
