//! jwatch configuration management
//! Handles loading and saving the YAML config file

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::session::jules::client::DEFAULT_BASE_URL;

/// Env var consulted when the config file carries no API key
pub const API_KEY_ENV: &str = "JWATCH_API_KEY";

/// Env var overriding the config file location
pub const CONFIG_PATH_ENV: &str = "JWATCH_CONFIG";

/// jwatch configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// API key for the remote session service
    #[serde(default)]
    pub api_key: String,

    /// Base URL of the remote session API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Per-request timeout applied by the HTTP client
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Polling behaviour
    #[serde(default)]
    pub monitor: MonitorConfig,
}

fn default_api_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            monitor: MonitorConfig::default(),
        }
    }
}

/// Monitor configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Delay between a successful fetch cycle and the next one
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// What to do when a fetch fails
    #[serde(default)]
    pub retry: RetryPolicy,
}

fn default_poll_interval_ms() -> u64 {
    30_000
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            retry: RetryPolicy::default(),
        }
    }
}

impl MonitorConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Fetch failure handling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RetryPolicy {
    /// Any failure ends the monitoring run
    #[default]
    Stop,

    /// Keep polling after a failure, up to `max_attempts` consecutive
    /// failures, waiting `delay_ms` before each retry
    Retry { max_attempts: u32, delay_ms: u64 },
}

impl Config {
    /// Load config from the given path, `JWATCH_CONFIG`, or the default location
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = Self::config_path(path)?;

        if !config_path.exists() {
            info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Config::default();
            config.save(path)?;
            return Ok(config);
        }

        let raw = fs::read_to_string(&config_path).context("Failed to read config file")?;

        let config: Config = serde_yaml::from_str(&raw).context("Failed to parse config file")?;

        debug!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    /// Save config to the resolved location
    pub fn save(&self, path: Option<&str>) -> Result<()> {
        let config_path = Self::config_path(path)?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(&self)?;
        fs::write(&config_path, content).context("Failed to write config file")?;

        info!("Saved config to {:?}", config_path);
        Ok(())
    }

    /// Get the config file path
    pub fn config_path(path: Option<&str>) -> Result<PathBuf> {
        if let Some(p) = path {
            return Ok(PathBuf::from(p));
        }

        if let Ok(env_path) = std::env::var(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(env_path));
        }

        let home = dirs::home_dir().context("Cannot find home directory")?;
        Ok(home.join(".jwatch").join("config.yml"))
    }

    /// API key from the file, falling back to `JWATCH_API_KEY`
    pub fn api_key(&self) -> Option<String> {
        let key = self.api_key.trim();
        if !key.is_empty() {
            return Some(key.to_string());
        }

        std::env::var(API_KEY_ENV)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
