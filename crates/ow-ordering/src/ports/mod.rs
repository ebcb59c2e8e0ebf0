//! Ports module for ordered writes
//!
//! Defines inbound (operation context) and outbound (event loop, connection,
//! transport) port traits.

pub mod inbound;
pub mod outbound;

pub use inbound::HandlerContext;
pub use outbound::{Channel, EventLoop, Task, Transport};
