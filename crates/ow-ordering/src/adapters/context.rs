//! # Transport Context
//!
//! The plain operation context sitting directly on a connection's transport.
//! It dispatches writes the way event-loop transports usually do:
//!
//! - called on the loop: the write reaches the transport immediately
//! - called off the loop: the write is appended to the loop's task queue
//!
//! That asymmetry is what lets an on-loop write overtake an off-loop write
//! that was invoked earlier. [`crate::OrderedWriteContext`] corrects it.

use crate::domain::errors::WriteError;
use crate::domain::promise::WritePromise;
use crate::domain::value_objects::WriteKind;
use crate::ports::inbound::HandlerContext;
use crate::ports::outbound::{Channel, Transport};
use ow_telemetry::WRITES_FAILED;
use parking_lot::Mutex;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// [`HandlerContext`] writing straight to a [`Transport`].
pub struct TransportContext<M> {
    name: String,
    channel: Arc<dyn Channel>,
    transport: Arc<dyn Transport<M>>,
    reads_requested: AtomicU64,
    user_events: Mutex<Vec<String>>,
}

impl<M: Send + 'static> TransportContext<M> {
    pub fn new(
        name: impl Into<String>,
        channel: Arc<dyn Channel>,
        transport: Arc<dyn Transport<M>>,
    ) -> Self {
        Self {
            name: name.into(),
            channel,
            transport,
            reads_requested: AtomicU64::new(0),
            user_events: Mutex::new(Vec::new()),
        }
    }

    /// Number of `read` requests received.
    pub fn reads_requested(&self) -> u64 {
        self.reads_requested.load(Ordering::Relaxed)
    }

    /// User events received, in order.
    pub fn user_events(&self) -> Vec<String> {
        self.user_events.lock().clone()
    }

    fn dispatch(&self, kind: WriteKind, msg: M, promise: WritePromise) -> WritePromise {
        let event_loop = self.channel.event_loop();

        if event_loop.in_event_loop() {
            issue_write(&*self.channel, &*self.transport, kind, msg, &promise);
            return promise;
        }

        trace!(channel = %self.channel.id(), kind = ?kind, "Scheduling off-loop write");
        let channel = Arc::clone(&self.channel);
        let transport = Arc::clone(&self.transport);
        let queued = promise.clone();
        let task = Box::new(move || issue_write(&*channel, &*transport, kind, msg, &queued));

        if let Err(e) = event_loop.execute(task) {
            fail_write(&promise, e.into());
        }
        promise
    }

    fn run_on_loop<F>(&self, op: &'static str, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let event_loop = self.channel.event_loop();
        if event_loop.in_event_loop() {
            f();
        } else if let Err(e) = event_loop.execute(Box::new(f)) {
            warn!(channel = %self.channel.id(), op, error = %e, "Operation dropped");
        }
    }
}

/// Issue one write on the loop thread, completing `promise` with the outcome.
fn issue_write<M>(
    channel: &dyn Channel,
    transport: &dyn Transport<M>,
    kind: WriteKind,
    msg: M,
    promise: &WritePromise,
) {
    if promise.is_done() {
        debug!(channel = %channel.id(), "Skipping write with completed promise");
        return;
    }

    if !channel.is_active() {
        fail_write(promise, WriteError::ChannelClosed);
        return;
    }

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        transport.write(msg).and_then(|()| {
            if kind.flushes() {
                transport.flush()
            } else {
                Ok(())
            }
        })
    }))
    .unwrap_or_else(|payload| {
        warn!(channel = %channel.id(), "Transport panicked during write");
        Err(WriteError::from_panic(payload.as_ref()))
    });

    match outcome {
        Ok(()) => {
            promise.try_success();
        }
        Err(err) => fail_write(promise, err),
    }
}

fn fail_write(promise: &WritePromise, err: WriteError) {
    WRITES_FAILED.with_label_values(&[err.reason()]).inc();
    debug!(error = %err, "Write failed");
    promise.try_failure(err);
}

impl<M: Send + 'static> HandlerContext for TransportContext<M> {
    type Message = M;

    fn name(&self) -> &str {
        &self.name
    }

    fn channel(&self) -> Arc<dyn Channel> {
        Arc::clone(&self.channel)
    }

    fn write_with(&self, msg: M, promise: WritePromise) -> WritePromise {
        self.dispatch(WriteKind::Write, msg, promise)
    }

    fn write_and_flush_with(&self, msg: M, promise: WritePromise) -> WritePromise {
        self.dispatch(WriteKind::WriteAndFlush, msg, promise)
    }

    fn flush(&self) {
        let channel = Arc::clone(&self.channel);
        let transport = Arc::clone(&self.transport);
        self.run_on_loop("flush", move || {
            if !channel.is_active() {
                return;
            }
            if let Err(e) = transport.flush() {
                warn!(channel = %channel.id(), error = %e, "Flush failed");
            }
        });
    }

    fn read(&self) {
        self.reads_requested.fetch_add(1, Ordering::Relaxed);
    }

    fn close(&self) -> WritePromise {
        let promise = self.channel.new_promise();
        let channel = Arc::clone(&self.channel);
        let transport = Arc::clone(&self.transport);
        let done = promise.clone();

        let event_loop = self.channel.event_loop();
        let close = move || {
            if channel.is_active() {
                channel.close();
                transport.close();
            }
            done.try_success();
        };

        if event_loop.in_event_loop() {
            close();
        } else if let Err(e) = event_loop.execute(Box::new(close)) {
            // Nothing can be issued on this connection any more
            self.channel.close();
            promise.try_failure(e.into());
        }
        promise
    }

    fn fire_user_event(&self, event: &str) {
        debug!(channel = %self.channel.id(), context = %self.name, event, "User event");
        self.user_events.lock().push(event.to_string());
    }
}
