//! Prometheus metrics for the write-ordering shim.
//!
//! All metrics follow the naming convention: `ow_<area>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{Counter, CounterVec, Encoder, Opts, Registry, TextEncoder};
use std::sync::{Arc, Once};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Ordered contexts installed (one per connection at most)
    pub static ref ORDERED_CONTEXTS_INSTALLED: Counter = Counter::new(
        "ow_ordering_contexts_installed_total",
        "Total number of ordered write contexts installed on connections"
    ).expect("metric creation failed");

    /// Writes issued directly on the calling (external) thread
    pub static ref WRITES_INLINE: Counter = Counter::new(
        "ow_ordering_writes_inline_total",
        "Writes issued immediately because the caller was off the event loop"
    ).expect("metric creation failed");

    /// Writes re-queued behind the event loop's pending tasks
    pub static ref WRITES_DEFERRED: Counter = Counter::new(
        "ow_ordering_writes_deferred_total",
        "Writes deferred onto the event loop queue because the caller was on the loop"
    ).expect("metric creation failed");

    /// Failed writes by reason
    pub static ref WRITES_FAILED: CounterVec = CounterVec::new(
        Opts::new("ow_transport_writes_failed_total", "Writes whose promise was failed"),
        &["reason"]  // reason: channel_closed/loop_shut_down/transport/cancelled
    ).expect("metric creation failed");

    /// Tasks the event loop refused after shutdown
    pub static ref LOOP_TASKS_REJECTED: Counter = Counter::new(
        "ow_event_loop_tasks_rejected_total",
        "Tasks rejected because the event loop was shut down"
    ).expect("metric creation failed");
}

static REGISTER: Once = Once::new();

/// Handle for the registered metrics
pub struct MetricsHandle {
    _registry: Arc<Registry>,
}

/// Register all metrics with the global registry.
///
/// Repeated calls return a fresh handle without registering twice.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let mut result = Ok(());

    REGISTER.call_once(|| {
        let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
            Box::new(ORDERED_CONTEXTS_INSTALLED.clone()),
            Box::new(WRITES_INLINE.clone()),
            Box::new(WRITES_DEFERRED.clone()),
            Box::new(WRITES_FAILED.clone()),
            Box::new(LOOP_TASKS_REJECTED.clone()),
        ];

        for metric in metrics {
            if let Err(e) = REGISTRY.register(metric) {
                result = Err(TelemetryError::MetricsInit(e.to_string()));
                return;
            }
        }
    });

    result?;

    Ok(MetricsHandle {
        _registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
