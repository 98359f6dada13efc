// Shared fakes for monitor tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use jwatch::monitor::PresentationSink;
use jwatch::session::{ActivityRecord, RemoteSessionClient, SessionSnapshot};
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Status(String),
    Activities(String),
}

#[derive(Clone)]
struct Reply<T> {
    delay: Duration,
    result: Result<T, String>,
}

/// Remote client answering from a per-session script after a simulated delay
#[derive(Default)]
pub struct ScriptedClient {
    status: Mutex<HashMap<String, Reply<SessionSnapshot>>>,
    activities: Mutex<HashMap<String, Reply<Vec<ActivityRecord>>>>,
    calls: Mutex<Vec<(Call, Instant)>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(self, session_id: &str, delay_ms: u64, result: Result<SessionSnapshot, &str>) -> Self {
        self.set_status(session_id, delay_ms, result);
        self
    }

    pub fn activities(
        self,
        session_id: &str,
        delay_ms: u64,
        result: Result<Vec<ActivityRecord>, &str>,
    ) -> Self {
        self.set_activities(session_id, delay_ms, result);
        self
    }

    /// Replace the status script of a session already in use
    pub fn set_status(&self, session_id: &str, delay_ms: u64, result: Result<SessionSnapshot, &str>) {
        self.status.lock().unwrap().insert(
            session_id.to_string(),
            Reply {
                delay: Duration::from_millis(delay_ms),
                result: result.map_err(str::to_string),
            },
        );
    }

    pub fn set_activities(
        &self,
        session_id: &str,
        delay_ms: u64,
        result: Result<Vec<ActivityRecord>, &str>,
    ) {
        self.activities.lock().unwrap().insert(
            session_id.to_string(),
            Reply {
                delay: Duration::from_millis(delay_ms),
                result: result.map_err(str::to_string),
            },
        );
    }

    /// Session that answers immediately with `state` and no activities
    pub fn healthy(self, session_id: &str, state: &str) -> Self {
        self.status(session_id, 0, Ok(snapshot(session_id, "T", state)))
            .activities(session_id, 0, Ok(vec![]))
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().iter().map(|(c, _)| c.clone()).collect()
    }

    pub fn status_calls(&self) -> Vec<Instant> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| matches!(c, Call::Status(_)))
            .map(|(_, at)| *at)
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push((call, Instant::now()));
    }
}

async fn answer<T: Clone>(reply: Option<Reply<T>>, session_id: &str) -> Result<T> {
    let reply = reply.unwrap_or_else(|| panic!("no script for {}", session_id));
    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }
    reply.result.map_err(anyhow::Error::msg)
}

#[async_trait]
impl RemoteSessionClient for ScriptedClient {
    async fn fetch_status(&self, session_id: &str) -> Result<SessionSnapshot> {
        self.record(Call::Status(session_id.to_string()));
        let reply = self.status.lock().unwrap().get(session_id).cloned();
        answer(reply, session_id).await
    }

    async fn fetch_activities(&self, session_id: &str) -> Result<Vec<ActivityRecord>> {
        self.record(Call::Activities(session_id.to_string()));
        let reply = self.activities.lock().unwrap().get(session_id).cloned();
        answer(reply, session_id).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shown {
    Loading(String),
    Status(SessionSnapshot),
    Activities(Vec<ActivityRecord>),
    Error(String),
    Validation(String),
}

/// Sink that remembers everything it was asked to show
#[derive(Default)]
pub struct RecordingSink {
    shown: Mutex<Vec<Shown>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shown(&self) -> Vec<Shown> {
        self.shown.lock().unwrap().clone()
    }

    pub fn statuses(&self) -> Vec<SessionSnapshot> {
        self.shown()
            .into_iter()
            .filter_map(|s| match s {
                Shown::Status(snapshot) => Some(snapshot),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.shown()
            .into_iter()
            .filter_map(|s| match s {
                Shown::Error(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    fn push(&self, shown: Shown) {
        self.shown.lock().unwrap().push(shown);
    }
}

impl PresentationSink for RecordingSink {
    fn show_loading(&self, session_id: &str) {
        self.push(Shown::Loading(session_id.to_string()));
    }

    fn show_status(&self, snapshot: &SessionSnapshot) {
        self.push(Shown::Status(snapshot.clone()));
    }

    fn show_activities(&self, records: &[ActivityRecord]) {
        self.push(Shown::Activities(records.to_vec()));
    }

    fn show_error(&self, message: &str) {
        self.push(Shown::Error(message.to_string()));
    }

    fn show_validation_message(&self, message: &str) {
        self.push(Shown::Validation(message.to_string()));
    }
}

pub fn snapshot(name: &str, title: &str, state: &str) -> SessionSnapshot {
    SessionSnapshot {
        name: name.to_string(),
        title: title.to_string(),
        state: state.to_string(),
    }
}

/// Let spawned work run; advances the paused clock by 1ms
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}
