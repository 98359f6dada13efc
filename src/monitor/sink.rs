//! Presentation sink trait

use crate::session::models::{ActivityRecord, SessionSnapshot};

/// Receives everything the monitor wants shown to the user
///
/// Calls are made while the controller holds its state lock, so an
/// implementation must not call back into the controller.
pub trait PresentationSink: Send + Sync {
    /// A fetch cycle for `session_id` is starting
    fn show_loading(&self, session_id: &str);

    fn show_status(&self, snapshot: &SessionSnapshot);

    fn show_activities(&self, records: &[ActivityRecord]);

    /// A fetch failed
    fn show_error(&self, message: &str);

    /// The user asked to monitor something that cannot be monitored
    fn show_validation_message(&self, message: &str);
}
