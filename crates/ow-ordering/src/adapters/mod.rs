//! Reference adapters hosting the ordering layer in-process.
//!
//! - `event_loop`: single-threaded FIFO loop on a dedicated thread
//! - `channel`: connection bound to one loop
//! - `context`: operation context writing straight to a transport
//! - `transport`: recording transport with fault injection

pub mod channel;
pub mod context;
pub mod event_loop;
pub mod transport;

pub use channel::LoopChannel;
pub use context::TransportContext;
pub use event_loop::SingleThreadEventLoop;
pub use transport::{RecordingTransport, TransportEvent};
