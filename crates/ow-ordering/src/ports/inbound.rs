//! Inbound Ports (Driving Ports / API)
//!
//! The operation context callers issue writes through. Several layers may
//! each hold a context referencing the same connection.

use crate::domain::promise::WritePromise;
use crate::ports::outbound::Channel;
use std::sync::Arc;

/// Operation context bound to one connection.
///
/// None of the methods block and none report failure synchronously: every
/// write outcome is delivered through its [`WritePromise`].
pub trait HandlerContext: Send + Sync {
    /// Outbound message type.
    type Message: Send + 'static;

    /// Context name, for logs.
    fn name(&self) -> &str;

    /// Connection this context operates on.
    fn channel(&self) -> Arc<dyn Channel>;

    /// Write `msg` with a fresh promise from the connection.
    fn write(&self, msg: Self::Message) -> WritePromise {
        let promise = self.channel().new_promise();
        self.write_with(msg, promise)
    }

    /// Write `msg`, completing the caller's `promise`. Returns that promise.
    fn write_with(&self, msg: Self::Message, promise: WritePromise) -> WritePromise;

    /// Write `msg` and flush, with a fresh promise from the connection.
    fn write_and_flush(&self, msg: Self::Message) -> WritePromise {
        let promise = self.channel().new_promise();
        self.write_and_flush_with(msg, promise)
    }

    /// Write `msg` and flush, completing the caller's `promise`.
    fn write_and_flush_with(&self, msg: Self::Message, promise: WritePromise) -> WritePromise;

    /// Flush previously written messages.
    fn flush(&self);

    /// Request more inbound data.
    fn read(&self);

    /// Close the connection. The promise completes once it is closed.
    fn close(&self) -> WritePromise;

    /// Pass a user-defined event down the pipeline.
    fn fire_user_event(&self, event: &str);
}
