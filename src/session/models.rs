//! Wire types for the remote session API

use serde::{Deserialize, Serialize};

/// Result of one status fetch
///
/// `state` is whatever the remote service reports ("IN_PROGRESS",
/// "COMPLETED", ...). It is not interpreted by the monitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub state: String,
}

/// One entry of a session's activity feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    pub name: String,
    #[serde(default)]
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_output: Option<ToolOutput>,
}

/// Output captured from a tool the agent ran
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolOutput {
    pub tool_name: String,
    #[serde(default)]
    pub output: String,
}

/// A repository the remote agent can work on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ListSourcesResponse {
    #[serde(default)]
    pub sources: Vec<Source>,
}

#[derive(Debug, Deserialize)]
pub struct ListSessionsResponse {
    #[serde(default)]
    pub sessions: Vec<SessionSnapshot>,
}

#[derive(Debug, Deserialize)]
pub struct ListActivitiesResponse {
    #[serde(default)]
    pub activities: Vec<ActivityRecord>,
}

/// Body of `POST sessions`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub prompt: String,
    pub source_context: SourceContext,
    pub automation_mode: AutomationMode,
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceContext {
    pub source: String,
    pub github_repo_context: GithubRepoContext,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GithubRepoContext {
    pub starting_branch: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AutomationMode {
    AutomationModeUnspecified,
    #[default]
    AutoCreatePr,
}

impl CreateSessionRequest {
    pub fn new(
        prompt: impl Into<String>,
        source: impl Into<String>,
        starting_branch: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            source_context: SourceContext {
                source: source.into(),
                github_repo_context: GithubRepoContext {
                    starting_branch: starting_branch.into(),
                },
            },
            automation_mode: AutomationMode::default(),
            title: title.into(),
        }
    }
}

/// Body of `POST sessions/{id}:sendMessage`
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest {
    pub prompt: String,
}
