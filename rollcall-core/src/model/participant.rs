use crate::model::position::SpatialPosition;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identifier assigned by the conferencing service. Opaque to this crate.
#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct ParticipantId(pub String);

impl ParticipantId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for ParticipantId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Descriptive fields delivered with a join. Each one may be absent.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct ParticipantMetadata {
    pub external_id: Option<String>,
    pub avatar_url: Option<String>,
    pub display_name: Option<String>,
}

impl ParticipantMetadata {
    pub const EXTERNAL_ID_KEY: &'static str = "externalId";
    pub const AVATAR_URL_KEY: &'static str = "avatarUrl";
    pub const NAME_KEY: &'static str = "name";

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            display_name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Reads the user-info map the conferencing service attaches to a join.
    /// Empty values count as absent.
    pub fn from_user_info(info: &HashMap<String, String>) -> Self {
        let field = |key: &str| {
            info.get(key)
                .filter(|value| !value.is_empty())
                .cloned()
        };

        Self {
            external_id: field(Self::EXTERNAL_ID_KEY),
            avatar_url: field(Self::AVATAR_URL_KEY),
            display_name: field(Self::NAME_KEY),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    pub id: ParticipantId,
    pub metadata: ParticipantMetadata,
    pub is_muted: bool,
    pub has_active_video: bool,
    pub position: SpatialPosition,
}

impl Participant {
    pub fn new(id: ParticipantId, metadata: ParticipantMetadata) -> Self {
        Self {
            id,
            metadata,
            is_muted: false,
            has_active_video: false,
            position: SpatialPosition::default(),
        }
    }

    /// Name shown in the list: the display name, or the raw id without one.
    pub fn label(&self) -> &str {
        self.metadata
            .display_name
            .as_deref()
            .unwrap_or(self.id.as_str())
    }
}
