//! # Ordered-Write Telemetry
//!
//! Structured logging and Prometheus metrics for the write-ordering shim.
//!
//! ## Components
//!
//! - **Logging**: `tracing-subscriber` registry with an `EnvFilter` and either a
//!   JSON or a human readable `fmt` layer
//! - **Metrics**: Prometheus counters describing how writes were routed
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ow_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let _guard = init_telemetry(TelemetryConfig::from_env()).expect("telemetry");
//!     // Writes issued through an ordered context are now logged and counted
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OW_SERVICE_NAME` | `ordered-write` | Service name attached to log lines |
//! | `OW_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `OW_JSON_LOGS` | `false` | Emit JSON formatted logs |
//! | `OW_CONSOLE_OUTPUT` | `true` | Write logs to stdout |

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::{init_logging, init_test_logging, LoggingGuard};
pub use metrics::{
    encode_metrics, register_metrics, MetricsHandle, LOOP_TASKS_REJECTED,
    ORDERED_CONTEXTS_INSTALLED, WRITES_DEFERRED, WRITES_FAILED, WRITES_INLINE,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and metrics.
///
/// Returns a guard that should be held for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let metrics = register_metrics()?;
    let logging = init_logging(&config)?;

    Ok(TelemetryGuard {
        _logging: logging,
        _metrics: metrics,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    _logging: LoggingGuard,
    _metrics: MetricsHandle,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("Shutting down telemetry...");
    }
}
