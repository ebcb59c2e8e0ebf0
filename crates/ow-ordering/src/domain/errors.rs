//! Error types for ordered writes

use std::any::Any;
use thiserror::Error;

/// Reasons a write promise is failed.
///
/// `Clone` because a single outcome is handed to every listener of a promise.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WriteError {
    /// The connection was closed before the write was issued
    #[error("Channel closed")]
    ChannelClosed,

    /// The owning event loop refused the task carrying the write
    #[error("Event loop shut down before the write was issued")]
    LoopShutDown,

    /// The transport rejected the write or the flush
    #[error("Transport error: {0}")]
    Transport(String),

    /// The promise was cancelled, or dropped before completion
    #[error("Write cancelled")]
    Cancelled,
}

impl WriteError {
    /// Short label used for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::ChannelClosed => "channel_closed",
            Self::LoopShutDown => "loop_shut_down",
            Self::Transport(_) => "transport",
            Self::Cancelled => "cancelled",
        }
    }

    /// Transport failure carrying the message of a caught panic.
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Self::Transport(format!("panicked: {message}"))
    }
}

/// Event loop errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoopError {
    /// Task submitted after shutdown
    #[error("Event loop '{0}' is shut down")]
    ShutDown(String),

    /// The loop thread could not be started
    #[error("Failed to spawn event loop thread: {0}")]
    Spawn(String),
}

impl From<LoopError> for WriteError {
    fn from(err: LoopError) -> Self {
        match err {
            LoopError::ShutDown(_) => Self::LoopShutDown,
            LoopError::Spawn(reason) => Self::Transport(reason),
        }
    }
}
