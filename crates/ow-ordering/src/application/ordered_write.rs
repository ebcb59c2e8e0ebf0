//! # Ordered Write Context
//!
//! Decorator over a [`HandlerContext`] that keeps writes in call order.
//!
//! The wrapped context writes through to the transport when called on the
//! event loop but queues the write when called from any other thread. An
//! on-loop write invoked after an off-loop one can therefore reach the
//! transport first. This context routes on-loop writes through the loop's
//! queue as well, so every write funnels through the same FIFO:
//!
//! ```text
//!   external thread ──write──► delegate ──execute──► ┌────────────┐
//!                                                    │ loop queue │──► transport
//!   event loop ──────write──► execute(delegate) ───► └────────────┘
//! ```
//!
//! Off-loop writes keep calling the delegate directly, which appends them to
//! the queue at call time. Two external threads racing each other are only
//! ordered by which call lands first.
//!
//! At most one ordered context exists per connection: [`OrderedWriteContext::wrap`]
//! marks the connection with [`ORDERED`] and returns already-marked contexts
//! untouched.

use crate::domain::attributes::AttributeKey;
use crate::domain::errors::WriteError;
use crate::domain::promise::WritePromise;
use crate::domain::value_objects::WriteKind;
use crate::ports::inbound::HandlerContext;
use crate::ports::outbound::Channel;
use ow_telemetry::{ORDERED_CONTEXTS_INSTALLED, WRITES_DEFERRED, WRITES_FAILED, WRITES_INLINE};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// Connection marker set once an ordered context is installed.
pub const ORDERED: AttributeKey<bool> = AttributeKey::new("OrderedWriteContext.ORDERED");

/// Shared handle to any operation context for messages of type `M`.
pub type SharedContext<M> = Arc<dyn HandlerContext<Message = M>>;

/// [`HandlerContext`] issuing writes in the order they are invoked.
pub struct OrderedWriteContext<M: Send + 'static> {
    delegate: SharedContext<M>,
    channel: Arc<dyn Channel>,
}

impl<M: Send + 'static> OrderedWriteContext<M> {
    /// Wrap `ctx` unless its connection already has an ordered context.
    ///
    /// The marker check and set is a single atomic step, so concurrent calls
    /// for the same connection install exactly one ordered context. Calls
    /// that lose return `ctx` itself.
    pub fn wrap(ctx: SharedContext<M>) -> SharedContext<M> {
        let channel = ctx.channel();

        if !channel.attributes().set_if_absent(&ORDERED, true) {
            trace!(
                channel = %channel.id(),
                context = ctx.name(),
                "Connection already has ordered writes"
            );
            return ctx;
        }

        ORDERED_CONTEXTS_INSTALLED.inc();
        info!(
            channel = %channel.id(),
            context = ctx.name(),
            event_loop = channel.event_loop().name(),
            "Ordered write context installed"
        );

        Arc::new(Self {
            delegate: ctx,
            channel,
        })
    }

    fn in_order(&self, kind: WriteKind, msg: M, promise: WritePromise) {
        let event_loop = self.channel.event_loop();

        if !event_loop.in_event_loop() {
            WRITES_INLINE.inc();
            issue(&*self.delegate, kind, msg, promise);
            return;
        }

        // Queue behind writes already scheduled from other threads
        WRITES_DEFERRED.inc();
        debug!(channel = %self.channel.id(), kind = ?kind, "Deferring on-loop write");

        let delegate = Arc::clone(&self.delegate);
        let queued = promise.clone();
        let task = Box::new(move || {
            let issued = panic::catch_unwind(AssertUnwindSafe(|| {
                issue(&*delegate, kind, msg, queued.clone())
            }));
            if let Err(payload) = issued {
                let err = WriteError::from_panic(payload.as_ref());
                WRITES_FAILED.with_label_values(&[err.reason()]).inc();
                warn!(context = delegate.name(), error = %err, "Deferred write panicked");
                queued.try_failure(err);
            }
        });

        if let Err(e) = event_loop.execute(task) {
            let err: WriteError = e.into();
            WRITES_FAILED.with_label_values(&[err.reason()]).inc();
            warn!(channel = %self.channel.id(), error = %err, "Deferred write rejected");
            promise.try_failure(err);
        }
    }
}

fn issue<M: Send + 'static>(
    delegate: &dyn HandlerContext<Message = M>,
    kind: WriteKind,
    msg: M,
    promise: WritePromise,
) {
    match kind {
        WriteKind::Write => delegate.write_with(msg, promise),
        WriteKind::WriteAndFlush => delegate.write_and_flush_with(msg, promise),
    };
}

impl<M: Send + 'static> HandlerContext for OrderedWriteContext<M> {
    type Message = M;

    fn name(&self) -> &str {
        self.delegate.name()
    }

    fn channel(&self) -> Arc<dyn Channel> {
        Arc::clone(&self.channel)
    }

    fn write(&self, msg: M) -> WritePromise {
        let promise = self.channel.new_promise();
        self.in_order(WriteKind::Write, msg, promise.clone());
        promise
    }

    fn write_with(&self, msg: M, promise: WritePromise) -> WritePromise {
        self.in_order(WriteKind::Write, msg, promise.clone());
        promise
    }

    fn write_and_flush(&self, msg: M) -> WritePromise {
        let promise = self.channel.new_promise();
        self.in_order(WriteKind::WriteAndFlush, msg, promise.clone());
        promise
    }

    fn write_and_flush_with(&self, msg: M, promise: WritePromise) -> WritePromise {
        self.in_order(WriteKind::WriteAndFlush, msg, promise.clone());
        promise
    }

    fn flush(&self) {
        self.delegate.flush();
    }

    fn read(&self) {
        self.delegate.read();
    }

    fn close(&self) -> WritePromise {
        self.delegate.close()
    }

    fn fire_user_event(&self, event: &str) {
        self.delegate.fire_user_event(event);
    }
}

/// Wrap `ctx` in an [`OrderedWriteContext`] unless its connection has one.
pub fn wrap<M: Send + 'static>(ctx: SharedContext<M>) -> SharedContext<M> {
    OrderedWriteContext::wrap(ctx)
}
