//! Test fixtures
//!
//! Wires a loop, a connection, a recording transport and a transport context
//! together so suites can drive writes from either side of the loop.
//!
//! # Example
//!
//! ```rust
//! use ow_ordering::testing::ConnectionFixture;
//! use ow_ordering::HandlerContext;
//!
//! let conn = ConnectionFixture::<u32>::new("doc-loop").unwrap();
//! let ctx = conn.ordered_context();
//! ctx.write(1).wait().unwrap();
//! assert_eq!(conn.drain(), vec![1]);
//! ```

use crate::adapters::{LoopChannel, RecordingTransport, SingleThreadEventLoop, TransportContext};
use crate::application::{wrap, SharedContext};
use crate::config::EventLoopConfig;
use crate::domain::errors::LoopError;
use crate::ports::outbound::EventLoop;
use std::sync::Arc;

/// One connection on its own loop, with every piece reachable.
pub struct ConnectionFixture<M> {
    pub event_loop: Arc<SingleThreadEventLoop>,
    pub channel: Arc<LoopChannel>,
    pub transport: Arc<RecordingTransport<M>>,
    pub context: Arc<TransportContext<M>>,
}

impl<M: Clone + Send + 'static> ConnectionFixture<M> {
    /// Start a loop thread called `loop_name` and a connection on it.
    pub fn new(loop_name: &str) -> Result<Self, LoopError> {
        let event_loop = Arc::new(SingleThreadEventLoop::with_config(
            EventLoopConfig::default().named(loop_name),
        )?);
        let channel = Arc::new(LoopChannel::new(event_loop.clone()));
        let transport = Arc::new(RecordingTransport::new());
        let context = Arc::new(TransportContext::new(
            "transport",
            channel.clone(),
            transport.clone(),
        ));

        Ok(Self {
            event_loop,
            channel,
            transport,
            context,
        })
    }

    /// The unordered transport context.
    pub fn raw_context(&self) -> SharedContext<M> {
        self.context.clone()
    }

    /// Wrap the transport context.
    ///
    /// Only the first call installs an ordered context; later calls find the
    /// connection marked and hand back the raw context.
    pub fn ordered_context(&self) -> SharedContext<M> {
        wrap(self.raw_context())
    }

    /// Run `f` on the loop and wait for its result.
    pub fn on_loop<F, R>(&self, f: F) -> Result<R, LoopError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        self.event_loop
            .submit(f)?
            .blocking_recv()
            .map_err(|_| LoopError::ShutDown(self.event_loop.name().to_string()))
    }

    /// Stop the loop after everything queued has run; return what the
    /// transport received.
    pub fn drain(&self) -> Vec<M> {
        self.event_loop.shutdown_gracefully();
        self.transport.messages()
    }
}
