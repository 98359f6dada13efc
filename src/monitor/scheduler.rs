//! One-shot delayed jobs

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::AbortHandle;
use tracing::debug;

/// Work run once when a timer fires
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Opaque handle to a scheduled job
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Runs a job once after a delay
///
/// Jobs never repeat. Anything that wants to run again has to
/// schedule itself again.
pub trait Scheduler: Send + Sync {
    /// Arrange for `job` to run once after `delay`
    fn schedule(&self, delay: Duration, job: Job) -> TimerHandle;

    /// Prevent a job from running. No-op if it already fired or was cancelled.
    fn cancel(&self, handle: TimerHandle);
}

/// Scheduler backed by `tokio::time::sleep`
///
/// Each timer is a spawned task; cancelling aborts it. Must be used from
/// within a tokio runtime.
#[derive(Default)]
pub struct TokioScheduler {
    next_id: AtomicU64,
    timers: Arc<Mutex<HashMap<u64, AbortHandle>>>,
}

impl TokioScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of timers armed but not yet fired or cancelled
    pub fn pending(&self) -> usize {
        lock(&self.timers).len()
    }
}

fn lock(timers: &Mutex<HashMap<u64, AbortHandle>>) -> MutexGuard<'_, HashMap<u64, AbortHandle>> {
    timers.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, job: Job) -> TimerHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let timers = Arc::clone(&self.timers);

        // Held until the abort handle is registered, so a zero delay
        // cannot fire before the timer is known.
        let mut armed = lock(&self.timers);
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let fired = lock(&timers).remove(&id).is_some();
            if fired {
                job();
            }
        });
        armed.insert(id, task.abort_handle());

        debug!("Armed timer {} for {:?}", id, delay);
        TimerHandle(id)
    }

    fn cancel(&self, handle: TimerHandle) {
        if let Some(task) = lock(&self.timers).remove(&handle.0) {
            task.abort();
            debug!("Cancelled timer {}", handle.0);
        }
    }
}
