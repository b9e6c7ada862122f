use crate::model::participant::ParticipantId;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Hash, Eq, PartialEq)]
pub struct StreamId(pub Uuid);

impl StreamId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for StreamId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle to an audio/video source delivered by the conferencing service.
#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq)]
pub struct MediaStream {
    pub id: StreamId,
}

impl MediaStream {
    pub fn new() -> Self {
        Self { id: StreamId::new() }
    }
}

impl Default for MediaStream {
    fn default() -> Self {
        Self::new()
    }
}

/// Where a stream is rendered.
#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq)]
pub enum Surface {
    /// Local camera preview.
    SelfView,
    /// Video area of the row showing this participant.
    Row(ParticipantId),
    /// The single shared screen-share area.
    ScreenShare,
}
