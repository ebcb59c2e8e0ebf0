//! In-memory transport that records what reaches it.

use crate::domain::errors::WriteError;
use crate::ports::outbound::Transport;
use parking_lot::Mutex;

/// One call observed by a [`RecordingTransport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportEvent<M> {
    Write(M),
    Flush,
    Close,
}

/// [`Transport`] keeping every accepted call in issue order.
///
/// Writes can be made to fail with [`RecordingTransport::fail_writes`].
pub struct RecordingTransport<M> {
    events: Mutex<Vec<TransportEvent<M>>>,
    failure: Mutex<Option<WriteError>>,
}

impl<M: Clone> RecordingTransport<M> {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
        }
    }

    /// Every accepted call, in issue order.
    pub fn events(&self) -> Vec<TransportEvent<M>> {
        self.events.lock().clone()
    }

    /// Accepted messages, in issue order.
    pub fn messages(&self) -> Vec<M> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                TransportEvent::Write(msg) => Some(msg.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of flushes seen.
    pub fn flush_count(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|event| matches!(event, TransportEvent::Flush))
            .count()
    }

    /// Reject every following write with `err`.
    pub fn fail_writes(&self, err: WriteError) {
        *self.failure.lock() = Some(err);
    }

    /// Accept writes again.
    pub fn heal(&self) {
        *self.failure.lock() = None;
    }
}

impl<M: Clone> Default for RecordingTransport<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Send> Transport<M> for RecordingTransport<M> {
    fn write(&self, msg: M) -> Result<(), WriteError> {
        if let Some(err) = self.failure.lock().clone() {
            return Err(err);
        }
        self.events.lock().push(TransportEvent::Write(msg));
        Ok(())
    }

    fn flush(&self) -> Result<(), WriteError> {
        self.events.lock().push(TransportEvent::Flush);
        Ok(())
    }

    fn close(&self) {
        self.events.lock().push(TransportEvent::Close);
    }
}
