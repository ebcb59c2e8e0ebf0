//! Configuration for the reference event loop

use serde::{Deserialize, Serialize};
use std::env;

/// Event loop configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLoopConfig {
    /// Name given to the loop thread
    pub thread_name: String,
    /// Stack size of the loop thread in bytes (platform default if unset)
    pub stack_size: Option<usize>,
}

impl Default for EventLoopConfig {
    fn default() -> Self {
        Self {
            thread_name: "ow-event-loop".to_string(),
            stack_size: None,
        }
    }
}

impl EventLoopConfig {
    /// Create configuration from environment variables.
    ///
    /// - `OW_LOOP_THREAD_NAME`: loop thread name (default: ow-event-loop)
    /// - `OW_LOOP_STACK_SIZE`: loop thread stack size in bytes
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            thread_name: env::var("OW_LOOP_THREAD_NAME").unwrap_or(defaults.thread_name),
            stack_size: env::var("OW_LOOP_STACK_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .or(defaults.stack_size),
        }
    }

    /// Same configuration with another thread name.
    pub fn named(mut self, thread_name: impl Into<String>) -> Self {
        self.thread_name = thread_name.into();
        self
    }
}
