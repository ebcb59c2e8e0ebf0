//! Completion handle for a single write.
//!
//! A [`WritePromise`] is completed exactly once, either successfully or with a
//! [`WriteError`]. Clones share the same outcome. Listeners run on whichever
//! thread completes the promise, after the internal lock is released, or
//! immediately on the registering thread if the promise is already complete.

use crate::domain::errors::WriteError;
use parking_lot::{Condvar, Mutex};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;

/// Outcome of a write.
pub type WriteResult = Result<(), WriteError>;

type Listener = Box<dyn FnOnce(&WriteResult) + Send + 'static>;

enum State {
    Pending(Vec<Listener>),
    Done(WriteResult),
}

struct Inner {
    state: Mutex<State>,
    done: Condvar,
}

/// Shared, complete-once handle for the outcome of one write.
#[derive(Clone)]
pub struct WritePromise {
    inner: Arc<Inner>,
}

impl WritePromise {
    /// Create a pending promise.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State::Pending(Vec::new())),
                done: Condvar::new(),
            }),
        }
    }

    /// Mark the write successful. Returns `false` if already complete.
    pub fn try_success(&self) -> bool {
        self.complete(Ok(()))
    }

    /// Mark the write failed. Returns `false` if already complete.
    pub fn try_failure(&self, err: WriteError) -> bool {
        self.complete(Err(err))
    }

    /// Fail the promise with [`WriteError::Cancelled`].
    ///
    /// A write whose promise is cancelled before it reaches the transport is
    /// not issued.
    pub fn cancel(&self) -> bool {
        self.complete(Err(WriteError::Cancelled))
    }

    fn complete(&self, outcome: WriteResult) -> bool {
        let listeners = {
            let mut state = self.inner.state.lock();
            let listeners = match &mut *state {
                State::Done(_) => return false,
                State::Pending(listeners) => std::mem::take(listeners),
            };
            *state = State::Done(outcome.clone());
            listeners
        };

        self.inner.done.notify_all();

        for listener in listeners {
            listener(&outcome);
        }
        true
    }

    /// Whether the promise has been completed.
    pub fn is_done(&self) -> bool {
        matches!(&*self.inner.state.lock(), State::Done(_))
    }

    /// Whether the promise completed successfully.
    pub fn is_success(&self) -> bool {
        matches!(&*self.inner.state.lock(), State::Done(Ok(())))
    }

    /// Failure cause, if the promise failed.
    pub fn cause(&self) -> Option<WriteError> {
        match &*self.inner.state.lock() {
            State::Done(Err(err)) => Some(err.clone()),
            _ => None,
        }
    }

    /// Outcome, if complete.
    pub fn result(&self) -> Option<WriteResult> {
        match &*self.inner.state.lock() {
            State::Done(outcome) => Some(outcome.clone()),
            State::Pending(_) => None,
        }
    }

    /// Register a completion callback.
    pub fn add_listener<F>(&self, listener: F)
    where
        F: FnOnce(&WriteResult) + Send + 'static,
    {
        let outcome = {
            let mut state = self.inner.state.lock();
            match &mut *state {
                State::Pending(listeners) => {
                    listeners.push(Box::new(listener));
                    return;
                }
                State::Done(outcome) => outcome.clone(),
            }
        };
        listener(&outcome);
    }

    /// Block until complete.
    ///
    /// Must not be called on the event loop that completes the promise.
    pub fn wait(&self) -> WriteResult {
        let mut state = self.inner.state.lock();
        loop {
            if let State::Done(outcome) = &*state {
                return outcome.clone();
            }
            self.inner.done.wait(&mut state);
        }
    }

    /// Block until complete or until `timeout` elapses.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<WriteResult> {
        let deadline = Instant::now() + timeout;
        let mut state = self.inner.state.lock();
        loop {
            if let State::Done(outcome) = &*state {
                return Some(outcome.clone());
            }
            if self.inner.done.wait_until(&mut state, deadline).timed_out() {
                return match &*state {
                    State::Done(outcome) => Some(outcome.clone()),
                    State::Pending(_) => None,
                };
            }
        }
    }

    /// Future resolving to the outcome.
    ///
    /// Resolves to [`WriteError::Cancelled`] if every handle to the promise is
    /// dropped without completing it.
    pub fn completion(&self) -> impl Future<Output = WriteResult> + Send + 'static {
        let (tx, rx) = oneshot::channel();
        self.add_listener(move |outcome| {
            let _ = tx.send(outcome.clone());
        });
        async move { rx.await.unwrap_or(Err(WriteError::Cancelled)) }
    }

    /// Whether both handles refer to the same promise.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for WritePromise {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for WritePromise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &*self.inner.state.lock() {
            State::Pending(listeners) => format!("Pending({} listeners)", listeners.len()),
            State::Done(Ok(())) => "Success".to_string(),
            State::Done(Err(err)) => format!("Failed({})", err),
        };
        f.debug_struct("WritePromise").field("state", &state).finish()
    }
}
