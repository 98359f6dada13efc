//! Session monitoring module
//! Polls a remote session's status and activity feed without ever
//! rendering results from an abandoned run

pub mod controller;
pub mod error;
pub mod generation;
pub mod scheduler;
pub mod sink;

pub use controller::{MonitorState, PollingController};
pub use error::MonitorError;
pub use generation::{Generation, GenerationGuard};
pub use scheduler::{Job, Scheduler, TimerHandle, TokioScheduler};
pub use sink::PresentationSink;
