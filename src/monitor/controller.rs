//! Polling controller
//!
//! Drives the fetch -> render -> reschedule cycle for one session at a
//! time. Every resumption after a remote call re-checks that the cycle's
//! generation is still current before touching the sink, so a superseded
//! run can never render, whatever order responses arrive in.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use anyhow::Result;
use futures::future::{BoxFuture, FutureExt};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::error::{describe, MonitorError, EMPTY_SESSION_MESSAGE};
use super::generation::{Generation, GenerationGuard};
use super::scheduler::{Scheduler, TimerHandle};
use super::sink::PresentationSink;
use crate::config::{MonitorConfig, RetryPolicy};
use crate::session::models::{ActivityRecord, SessionSnapshot};
use crate::session::provider::RemoteSessionClient;

/// Observable controller state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorState {
    Idle,
    Monitoring {
        generation: Generation,
        session_id: String,
    },
}

/// One "watch this session" request
#[derive(Debug)]
struct MonitoringRun {
    session_id: String,
    generation: Generation,
    /// Consecutive failed cycles, only consulted by `RetryPolicy::Retry`
    failures: u32,
}

#[derive(Debug, Default)]
struct Slot {
    guard: GenerationGuard,
    run: Option<MonitoringRun>,
    pending: Option<TimerHandle>,
}

struct Shared {
    client: Arc<dyn RemoteSessionClient>,
    sink: Arc<dyn PresentationSink>,
    scheduler: Arc<dyn Scheduler>,
    config: MonitorConfig,
    slot: Mutex<Slot>,
    /// Latest state, published on every start and every return to idle
    state_tx: watch::Sender<MonitorState>,
}

/// Starts, stops and drives session monitoring
///
/// Spawns onto the ambient tokio runtime. Dropping the controller stops
/// monitoring.
pub struct PollingController {
    shared: Arc<Shared>,
}

impl PollingController {
    pub fn new(
        client: Arc<dyn RemoteSessionClient>,
        sink: Arc<dyn PresentationSink>,
        scheduler: Arc<dyn Scheduler>,
        config: MonitorConfig,
    ) -> Self {
        let (state_tx, _) = watch::channel(MonitorState::Idle);
        Self {
            shared: Arc::new(Shared {
                client,
                sink,
                scheduler,
                config,
                slot: Mutex::new(Slot::default()),
                state_tx,
            }),
        }
    }

    /// Begin monitoring `session_id`, superseding any current run
    ///
    /// The first fetch cycle starts right away. A blank id is reported
    /// through the sink's validation path and leaves the current run alone.
    pub fn start(&self, session_id: &str) -> Result<Generation, MonitorError> {
        let session_id = session_id.trim();
        if session_id.is_empty() {
            self.shared.sink.show_validation_message(EMPTY_SESSION_MESSAGE);
            return Err(MonitorError::EmptySessionId);
        }

        let generation = {
            let mut slot = self.shared.lock();
            if let Some(handle) = slot.pending.take() {
                self.shared.scheduler.cancel(handle);
            }
            let generation = slot.guard.new_generation();
            slot.run = Some(MonitoringRun {
                session_id: session_id.to_string(),
                generation,
                failures: 0,
            });
            self.shared.state_tx.send_replace(MonitorState::Monitoring {
                generation,
                session_id: session_id.to_string(),
            });
            generation
        };

        info!("Monitoring session {} ({})", session_id, generation);
        tokio::spawn(Arc::clone(&self.shared).cycle(generation, session_id.to_string()));

        Ok(generation)
    }

    /// Stop monitoring. Responses still in flight will be discarded.
    pub fn stop(&self) {
        let mut slot = self.shared.lock();
        self.shared.end_run(&mut slot);
    }

    pub fn state(&self) -> MonitorState {
        let slot = self.shared.lock();
        match &slot.run {
            Some(run) if slot.guard.is_current(run.generation) => MonitorState::Monitoring {
                generation: run.generation,
                session_id: run.session_id.clone(),
            },
            _ => MonitorState::Idle,
        }
    }

    /// Follow state changes, e.g. to wait until a run ends on its own
    pub fn subscribe(&self) -> watch::Receiver<MonitorState> {
        self.shared.state_tx.subscribe()
    }

    pub fn is_monitoring(&self) -> bool {
        matches!(self.state(), MonitorState::Monitoring { .. })
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.shared.config
    }
}

impl Drop for PollingController {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// One status-then-activities round for `generation`
    fn cycle(self: Arc<Self>, generation: Generation, session_id: String) -> BoxFuture<'static, ()> {
        async move {
            if !self.begin(generation, &session_id) {
                return;
            }

            let status = self.client.fetch_status(&session_id).await;
            if !self.apply_status(generation, &session_id, status) {
                return;
            }

            let activities = self.client.fetch_activities(&session_id).await;
            self.apply_activities(generation, session_id, activities);
        }
        .boxed()
    }

    fn begin(&self, generation: Generation, session_id: &str) -> bool {
        let mut slot = self.lock();
        if !slot.guard.is_current(generation) {
            debug!("Skipping cycle for superseded {}", generation);
            return false;
        }

        // The timer that led here, if any, has already fired.
        slot.pending = None;
        self.sink.show_loading(session_id);
        true
    }

    fn apply_status(
        self: &Arc<Self>,
        generation: Generation,
        session_id: &str,
        result: Result<SessionSnapshot>,
    ) -> bool {
        let mut slot = self.lock();
        if !slot.guard.is_current(generation) {
            debug!("Discarding stale status for {} ({})", session_id, generation);
            return false;
        }

        match result {
            Ok(snapshot) => {
                self.sink.show_status(&snapshot);
                true
            }
            Err(err) => {
                self.fail(&mut slot, generation, session_id, err);
                false
            }
        }
    }

    fn apply_activities(
        self: &Arc<Self>,
        generation: Generation,
        session_id: String,
        result: Result<Vec<ActivityRecord>>,
    ) {
        let mut slot = self.lock();
        if !slot.guard.is_current(generation) {
            debug!("Discarding stale activities for {} ({})", session_id, generation);
            return;
        }

        match result {
            Ok(records) => {
                self.sink.show_activities(&records);
                if let Some(run) = slot.run.as_mut() {
                    run.failures = 0;
                }
                let delay = self.config.poll_interval();
                self.reschedule(&mut slot, generation, session_id, delay);
            }
            Err(err) => self.fail(&mut slot, generation, &session_id, err),
        }
    }

    fn fail(
        self: &Arc<Self>,
        slot: &mut Slot,
        generation: Generation,
        session_id: &str,
        err: anyhow::Error,
    ) {
        let message = describe(&err);
        warn!("Fetch for {} failed: {}", session_id, message);
        self.sink.show_error(&message);

        let retry = match (self.config.retry, slot.run.as_mut()) {
            (RetryPolicy::Retry { max_attempts, delay_ms }, Some(run))
                if run.failures < max_attempts =>
            {
                run.failures += 1;
                info!(
                    "Retrying {} in {}ms (attempt {}/{})",
                    session_id, delay_ms, run.failures, max_attempts
                );
                Some(Duration::from_millis(delay_ms))
            }
            _ => None,
        };

        match retry {
            Some(delay) => self.reschedule(slot, generation, session_id.to_string(), delay),
            None => self.end_run(slot),
        }
    }

    fn reschedule(
        self: &Arc<Self>,
        slot: &mut Slot,
        generation: Generation,
        session_id: String,
        delay: Duration,
    ) {
        debug!("Next cycle for {} in {:?}", session_id, delay);

        let shared = Arc::clone(self);
        let handle = self.scheduler.schedule(
            delay,
            Box::new(move || {
                tokio::spawn(shared.cycle(generation, session_id));
            }),
        );

        if let Some(previous) = slot.pending.replace(handle) {
            self.scheduler.cancel(previous);
        }
    }

    /// Back to idle: drop the pending timer and invalidate the run's generation
    fn end_run(&self, slot: &mut Slot) {
        if let Some(handle) = slot.pending.take() {
            self.scheduler.cancel(handle);
        }

        if let Some(run) = slot.run.take() {
            slot.guard.new_generation();
            self.state_tx.send_replace(MonitorState::Idle);
            info!("Stopped monitoring {} ({})", run.session_id, run.generation);
        }
    }
}
