//! Cancellable delayed work and the debouncer built on it.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;

/// A unit of work scheduled to start after a delay.
///
/// `cancel()` only covers the waiting period. Once the delay has elapsed the
/// work is handed to its own task and runs to completion.
#[derive(Debug)]
pub struct DelayedTask {
    handle: JoinHandle<()>,
}

impl DelayedTask {
    /// Schedule `work` to start after `delay`. Must be called within a tokio runtime.
    pub fn spawn<F>(delay: Duration, work: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(work);
        });
        Self { handle }
    }

    /// Cancel the task if it is still waiting
    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// Whether the wait is over (fired or cancelled)
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Trailing-edge debouncer: only the last call within `wait` fires.
#[derive(Debug)]
pub struct Debouncer {
    wait: Duration,
    pending: Mutex<Option<DelayedTask>>,
}

impl Debouncer {
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            pending: Mutex::new(None),
        }
    }

    pub fn wait(&self) -> Duration {
        self.wait
    }

    /// Schedule `work`, replacing any call still waiting
    pub fn call<F>(&self, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let task = DelayedTask::spawn(self.wait, work);
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = pending.replace(task) {
            previous.cancel();
        }
    }

    /// Drop the pending call, if any. Returns true if one was still waiting.
    pub fn cancel(&self) -> bool {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        match pending.take() {
            Some(task) => {
                let was_waiting = !task.is_finished();
                task.cancel();
                was_waiting
            }
            None => false,
        }
    }

    /// Whether a call is scheduled and still waiting
    pub fn is_pending(&self) -> bool {
        let pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.as_ref().is_some_and(|task| !task.is_finished())
    }
}
