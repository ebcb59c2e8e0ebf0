//! Outbound Ports (Driven Ports / SPI)
//!
//! What the ordering layer consumes from the connection it is installed on.

use crate::domain::attributes::AttributeMap;
use crate::domain::errors::{LoopError, WriteError};
use crate::domain::promise::WritePromise;
use crate::domain::value_objects::ChannelId;
use std::sync::Arc;

/// Unit of work run on an event loop.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Single-threaded, FIFO, run-to-completion executor owning a connection.
pub trait EventLoop: Send + Sync {
    /// Loop name, for logs.
    fn name(&self) -> &str;

    /// Whether the calling thread is this loop's thread.
    fn in_event_loop(&self) -> bool;

    /// Append a task to the loop's queue.
    ///
    /// Tasks run in submission order. Fails once the loop is shut down.
    fn execute(&self, task: Task) -> Result<(), LoopError>;

    /// Whether the loop has stopped accepting tasks.
    fn is_shutdown(&self) -> bool;
}

/// One logical network connection.
pub trait Channel: Send + Sync {
    /// Connection identity.
    fn id(&self) -> ChannelId;

    /// The loop all of this connection's I/O is dispatched to.
    fn event_loop(&self) -> Arc<dyn EventLoop>;

    /// Out-of-band state attached to the connection.
    fn attributes(&self) -> &AttributeMap;

    /// Create a pending promise for a write on this connection.
    fn new_promise(&self) -> WritePromise {
        WritePromise::new()
    }

    /// Whether the connection is still open.
    fn is_active(&self) -> bool;

    /// Mark the connection closed.
    fn close(&self);
}

/// Byte sink behind a connection.
///
/// Only ever called from the connection's event loop.
pub trait Transport<M>: Send + Sync {
    /// Accept one message.
    fn write(&self, msg: M) -> Result<(), WriteError>;

    /// Push accepted messages out.
    fn flush(&self) -> Result<(), WriteError>;

    /// Release the underlying resource.
    fn close(&self) {}
}
