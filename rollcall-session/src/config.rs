use crate::error::{Result, SessionError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for a conference session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Capacity of the UI command queue.
    pub command_capacity: usize,
    /// Capacity of the conferencing service event queue.
    pub event_capacity: usize,
    /// Where the last used conference id is kept.
    pub preferences_path: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            command_capacity: 100,
            event_capacity: 256,
            preferences_path: PathBuf::from("rollcall_prefs.json"),
        }
    }
}

impl SessionConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Queue capacities must be non-zero.
    pub fn validate(&self) -> Result<()> {
        if self.command_capacity == 0 {
            return Err(SessionError::InvalidConfig {
                field: "command_capacity",
            });
        }
        if self.event_capacity == 0 {
            return Err(SessionError::InvalidConfig {
                field: "event_capacity",
            });
        }
        Ok(())
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }
}
