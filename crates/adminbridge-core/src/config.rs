//! Client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_TIMEOUT_MS: u64 = 50_000;
const DEFAULT_LOGIN_ENTRY: &str = "/login";
const DEFAULT_REAUTH_MESSAGE: &str = "Your session has expired. Sign in again?";
const MIN_TIMEOUT_MS: u64 = 100;

/// Configuration shared by the transport, the stores and the session guard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Prefix for every relative request path.
    pub base_url: String,
    /// Global request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Base used to absolutize relative avatar paths. Falls back to `base_url`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_base_url: Option<String>,
    /// Path prefixes the server returns for locally hosted assets.
    pub relative_asset_prefixes: Vec<String>,
    /// Where the navigator is sent after a confirmed re-authentication.
    pub login_entry: String,
    /// Text shown by the re-authentication prompt.
    pub reauth_message: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            asset_base_url: None,
            relative_asset_prefixes: vec!["/static/".to_string()],
            login_entry: DEFAULT_LOGIN_ENTRY.to_string(),
            reauth_message: DEFAULT_REAUTH_MESSAGE.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_asset_base_url(mut self, url: impl Into<String>) -> Self {
        self.asset_base_url = Some(url.into());
        self
    }

    pub fn with_login_entry(mut self, entry: impl Into<String>) -> Self {
        self.login_entry = entry.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn asset_base(&self) -> &str {
        self.asset_base_url
            .as_deref()
            .unwrap_or(&self.base_url)
            .trim_end_matches('/')
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(ClientError::Config("base_url must not be empty".to_string()));
        }

        url::Url::parse(&self.base_url).map_err(|e| {
            ClientError::Config(format!("Invalid base_url '{}': {}", self.base_url, e))
        })?;

        if let Some(asset_base) = &self.asset_base_url {
            url::Url::parse(asset_base).map_err(|e| {
                ClientError::Config(format!("Invalid asset_base_url '{}': {}", asset_base, e))
            })?;
        }

        if self.timeout_ms < MIN_TIMEOUT_MS {
            return Err(ClientError::Config(format!(
                "timeout_ms must be at least {}",
                MIN_TIMEOUT_MS
            )));
        }

        Ok(())
    }
}
