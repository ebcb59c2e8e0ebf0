//! # Ordered Write
//!
//! Keeps writes on a connection in call order when they are issued both from
//! the connection's event loop and from other threads.
//!
//! ## The Problem
//!
//! Event-loop transports write through immediately when called on the loop
//! but queue the write when called from elsewhere:
//!
//! ```text
//! external:  write(a) ──► queue: [a]
//! loop:      write(b) ──► transport: b        (a still queued)
//! loop:      run queue ─► transport: b, a     ✗
//! ```
//!
//! ## The Fix
//!
//! [`wrap`] installs an [`OrderedWriteContext`] on the connection. Writes
//! invoked on the loop are queued too, behind anything external threads
//! queued before them:
//!
//! ```text
//! external:  write(a) ──► queue: [a]
//! loop:      write(b) ──► queue: [a, b]
//! loop:      run queue ─► transport: a, b     ✓
//! ```
//!
//! ## Architecture
//!
//! - **Domain**: promise, attributes, errors, ordering invariants
//! - **Ports**: inbound (`HandlerContext`) and outbound (`EventLoop`, `Channel`, `Transport`)
//! - **Application**: the `OrderedWriteContext` decorator and `wrap`
//! - **Adapters**: reference loop, connection, transport context and recording transport

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod testing;

pub use adapters::{
    LoopChannel, RecordingTransport, SingleThreadEventLoop, TransportContext, TransportEvent,
};
pub use application::{wrap, OrderedWriteContext, SharedContext, ORDERED};
pub use config::EventLoopConfig;
pub use domain::{
    AttributeKey, AttributeMap, ChannelId, LoopError, WriteError, WriteKind, WritePromise,
    WriteResult,
};
pub use ports::{Channel, EventLoop, HandlerContext, Task, Transport};
