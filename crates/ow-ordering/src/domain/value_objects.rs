//! Value objects for ordered writes

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identity of a connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(Uuid);

impl ChannelId {
    /// Generate a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ChannelId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short form, enough to tell connections apart in logs
        let simple = self.0.simple().to_string();
        f.write_str(&simple[..8])
    }
}

/// Write-class operation being ordered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WriteKind {
    /// Buffer the message
    Write,
    /// Buffer the message, then flush
    WriteAndFlush,
}

impl WriteKind {
    /// Whether a flush follows the write.
    pub fn flushes(self) -> bool {
        matches!(self, Self::WriteAndFlush)
    }
}
