//! Remote session client trait

use anyhow::Result;
use async_trait::async_trait;

use super::models::{ActivityRecord, SessionSnapshot};

/// The two reads the monitor needs from a remote session backend
///
/// Implementations own transport concerns (auth, timeouts). Either call
/// may fail; the monitor treats every error the same way.
#[async_trait]
pub trait RemoteSessionClient: Send + Sync {
    /// Fetch the current status snapshot of a session
    async fn fetch_status(&self, session_id: &str) -> Result<SessionSnapshot>;

    /// Fetch the activity feed of a session
    async fn fetch_activities(&self, session_id: &str) -> Result<Vec<ActivityRecord>>;
}
