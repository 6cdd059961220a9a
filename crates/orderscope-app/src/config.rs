//! Application configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use orderscope_client::RetryPolicy;
use orderscope_dashboard::DashboardConfig;
use orderscope_feed::PollConfig;

use crate::error::{AppError, AppResult};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Main API base URL (tickers, brokers, volume).
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Strategy-vault API base URL (separate host).
    #[serde(default = "default_vaults_base_url")]
    pub vaults_base_url: String,
    /// Per-attempt HTTP timeout (seconds).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Retry behavior for upstream fetches.
    #[serde(default)]
    pub retry: RetryConfig,
    /// Poll intervals and builder roster.
    #[serde(default)]
    pub poll: PollConfig,
    /// Dashboard server configuration.
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

fn default_api_base_url() -> String {
    "https://api-evm.orderly.org".to_string()
}

fn default_vaults_base_url() -> String {
    "https://api-sv.orderly.org".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

/// Retry configuration, converted to a [`RetryPolicy`] at wiring time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries after the first attempt. Default: 2 (3 attempts total).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Fixed wait before a rate-limit retry (milliseconds). Default: 1000.
    #[serde(default = "default_backoff_delay_ms")]
    pub backoff_delay_ms: u64,
    /// Envelope code that makes a retry safe. Default: -1003.
    #[serde(default = "default_rate_limit_code")]
    pub rate_limit_code: i64,
}

fn default_max_retries() -> u32 {
    2
}

fn default_backoff_delay_ms() -> u64 {
    1000
}

fn default_rate_limit_code() -> i64 {
    -1003
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            backoff_delay_ms: default_backoff_delay_ms(),
            rate_limit_code: default_rate_limit_code(),
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            backoff_delay: Duration::from_millis(self.backoff_delay_ms),
            rate_limit_code: self.rate_limit_code,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            vaults_base_url: default_vaults_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            retry: RetryConfig::default(),
            poll: PollConfig::default(),
            dashboard: DashboardConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &str) -> AppResult<Self> {
        if std::path::Path::new(path).exists() {
            Self::from_file(path)
        } else {
            tracing::warn!(path = %path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
