//! Remote session access

pub mod jules;
pub mod models;
pub mod provider;

pub use jules::JulesClient;
pub use models::{ActivityRecord, SessionSnapshot, Source, ToolOutput};
pub use provider::RemoteSessionClient;
