//! Jules HTTP API client

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::session::models::{
    ActivityRecord, CreateSessionRequest, ListActivitiesResponse, ListSessionsResponse,
    ListSourcesResponse, SendMessageRequest, SessionSnapshot, Source,
};
use crate::session::provider::RemoteSessionClient;

pub const DEFAULT_BASE_URL: &str = "https://jules.googleapis.com/v1alpha";

const API_KEY_HEADER: &str = "X-Goog-Api-Key";

/// Jules API client
#[derive(Clone)]
pub struct JulesClient {
    client: Client,
    base_url: String,
}

impl JulesClient {
    /// Create a new client with the API key sent on every request
    pub fn new(api_key: &str, base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            API_KEY_HEADER,
            HeaderValue::from_str(api_key).context("API key is not a valid header value")?,
        );

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5))
            .default_headers(headers)
            .user_agent(format!("jwatch/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a request and fail on any non-2xx status
    async fn send(&self, request: RequestBuilder, url: &str) -> Result<Response> {
        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("API request failed: {} - {}", status, body);
        }

        Ok(response)
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("GET {}", url);

        self.send(self.client.get(&url), &url)
            .await?
            .json::<T>()
            .await
            .context("Failed to parse API response")
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("POST {}", url);

        self.send(self.client.post(&url).json(body), &url)
            .await?
            .json::<T>()
            .await
            .context("Failed to parse API response")
    }

    /// List the sources the agent can work on
    pub async fn list_sources(&self) -> Result<Vec<Source>> {
        let response: ListSourcesResponse = self.get("sources").await?;
        Ok(response.sources)
    }

    /// List known sessions
    pub async fn list_sessions(&self) -> Result<Vec<SessionSnapshot>> {
        let response: ListSessionsResponse = self.get("sessions").await?;
        Ok(response.sessions)
    }

    /// Create a new session
    pub async fn create_session(&self, request: &CreateSessionRequest) -> Result<SessionSnapshot> {
        let session: SessionSnapshot = self.post("sessions", request).await?;
        info!("Created session: {}", session.name);
        Ok(session)
    }

    /// Send a user message to a session's agent; the reply shows up in its activities
    pub async fn send_message(&self, session_id: &str, prompt: &str) -> Result<()> {
        let url = format!("{}/{}:sendMessage", self.base_url, session_path(session_id));
        debug!("POST {}", url);

        let body = SendMessageRequest {
            prompt: prompt.to_string(),
        };
        self.send(self.client.post(&url).json(&body), &url).await?;

        info!("Sent message to session: {}", session_id);
        Ok(())
    }
}

/// Resource path for a session id; accepts both `abc` and `sessions/abc`
fn session_path(session_id: &str) -> String {
    let id = session_id.strip_prefix("sessions/").unwrap_or(session_id);
    format!("sessions/{}", id)
}

#[async_trait]
impl RemoteSessionClient for JulesClient {
    async fn fetch_status(&self, session_id: &str) -> Result<SessionSnapshot> {
        self.get(&session_path(session_id)).await
    }

    async fn fetch_activities(&self, session_id: &str) -> Result<Vec<ActivityRecord>> {
        let response: ListActivitiesResponse = self
            .get(&format!("{}/activities", session_path(session_id)))
            .await?;
        Ok(response.activities)
    }
}
