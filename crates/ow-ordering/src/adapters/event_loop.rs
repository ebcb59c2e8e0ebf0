//! # Single-Threaded Event Loop
//!
//! A dedicated OS thread draining an unbounded FIFO queue. Tasks run to
//! completion one at a time in submission order. Whether a caller is "on the
//! loop" is decided by comparing thread identities.
//!
//! Shutdown stops intake, lets the thread drain what is already queued, then
//! joins it. Tasks queued by the draining tasks themselves are rejected.

use crate::config::EventLoopConfig;
use crate::domain::errors::LoopError;
use crate::ports::outbound::{EventLoop, Task};
use ow_telemetry::LOOP_TASKS_REJECTED;
use parking_lot::Mutex;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// Reference [`EventLoop`] backed by one OS thread.
pub struct SingleThreadEventLoop {
    name: String,
    sender: Mutex<Option<mpsc::UnboundedSender<Task>>>,
    thread_id: ThreadId,
    handle: Mutex<Option<JoinHandle<()>>>,
    tasks_executed: Arc<AtomicU64>,
}

impl SingleThreadEventLoop {
    /// Start a loop with the default configuration.
    pub fn new() -> Result<Self, LoopError> {
        Self::with_config(EventLoopConfig::default())
    }

    /// Start a loop thread.
    pub fn with_config(config: EventLoopConfig) -> Result<Self, LoopError> {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Task>();
        let tasks_executed = Arc::new(AtomicU64::new(0));

        let executed = Arc::clone(&tasks_executed);
        let loop_name = config.thread_name.clone();
        let mut builder = thread::Builder::new().name(config.thread_name.clone());
        if let Some(stack_size) = config.stack_size {
            builder = builder.stack_size(stack_size);
        }

        let handle = builder
            .spawn(move || {
                while let Some(task) = receiver.blocking_recv() {
                    if panic::catch_unwind(AssertUnwindSafe(task)).is_err() {
                        warn!(event_loop = %loop_name, "Event loop task panicked");
                    }
                    executed.fetch_add(1, Ordering::Relaxed);
                }
                debug!(event_loop = %loop_name, "Event loop drained");
            })
            .map_err(|e| LoopError::Spawn(e.to_string()))?;

        let thread_id = handle.thread().id();
        info!(event_loop = %config.thread_name, "Event loop started");

        Ok(Self {
            name: config.thread_name,
            sender: Mutex::new(Some(sender)),
            thread_id,
            handle: Mutex::new(Some(handle)),
            tasks_executed,
        })
    }

    /// Run `f` on the loop and receive its result.
    pub fn submit<F, R>(&self, f: F) -> Result<oneshot::Receiver<R>, LoopError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        self.execute(Box::new(move || {
            let _ = tx.send(f());
        }))?;
        Ok(rx)
    }

    /// Number of tasks run so far.
    pub fn tasks_executed(&self) -> u64 {
        self.tasks_executed.load(Ordering::Relaxed)
    }

    /// Stop accepting tasks, drain the queue and join the loop thread.
    ///
    /// Called from the loop itself, it only stops intake; the thread exits
    /// once the queue is empty.
    pub fn shutdown_gracefully(&self) {
        let Some(sender) = self.sender.lock().take() else {
            return;
        };
        drop(sender);
        info!(event_loop = %self.name, "Event loop shutting down");

        if self.in_event_loop() {
            return;
        }

        let handle = self.handle.lock().take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                warn!(event_loop = %self.name, "Event loop thread terminated abnormally");
            }
        }
    }
}

impl EventLoop for SingleThreadEventLoop {
    fn name(&self) -> &str {
        &self.name
    }

    fn in_event_loop(&self) -> bool {
        thread::current().id() == self.thread_id
    }

    fn execute(&self, task: Task) -> Result<(), LoopError> {
        let accepted = match self.sender.lock().as_ref() {
            Some(sender) => sender.send(task).is_ok(),
            None => false,
        };

        if accepted {
            return Ok(());
        }

        LOOP_TASKS_REJECTED.inc();
        warn!(event_loop = %self.name, "Task rejected, event loop is shut down");
        Err(LoopError::ShutDown(self.name.clone()))
    }

    fn is_shutdown(&self) -> bool {
        self.sender.lock().is_none()
    }
}

impl Drop for SingleThreadEventLoop {
    fn drop(&mut self) {
        self.shutdown_gracefully();
    }
}
