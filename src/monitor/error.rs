//! Monitor errors

/// Message shown when `start` is given a blank session id
pub const EMPTY_SESSION_MESSAGE: &str = "Please enter a session name.";

/// Errors returned by the polling controller
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MonitorError {
    #[error("Session id is empty")]
    EmptySessionId,
}

/// Render a fetch failure for display, including its context chain
pub fn describe(err: &anyhow::Error) -> String {
    format!("{:#}", err)
}
