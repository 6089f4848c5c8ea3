//! CLI configuration file support
//!
//! Loads configuration from ~/.config/adminbridge/config.toml

use std::path::PathBuf;

use adminbridge_core::ClientConfig;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::cli::Cli;

/// CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Client settings shared with the library
    #[serde(default)]
    pub client: ClientConfig,
    /// Session persistence settings
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session database path
    pub path: Option<String>,
    /// Keep the session in memory only
    #[serde(default)]
    pub ephemeral: bool,
}

impl CliConfig {
    /// Load configuration from default path
    pub fn load() -> Self {
        Self::load_from_path(Self::default_path())
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: Option<PathBuf>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "Ignoring unreadable config file");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Get the default configuration file path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("adminbridge").join("config.toml"))
    }

    /// Flags and environment variables win over the file.
    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(base_url) = &cli.base_url {
            self.client.base_url = base_url.clone();
        }
        if let Some(timeout_ms) = cli.timeout_ms {
            self.client.timeout_ms = timeout_ms;
        }
        if let Some(path) = &cli.session_path {
            self.session.path = Some(path.clone());
        }
        if cli.ephemeral {
            self.session.ephemeral = true;
        }
    }

    /// Session database location: configured path or the data directory.
    pub fn session_path(&self) -> Option<PathBuf> {
        self.session
            .path
            .as_ref()
            .map(PathBuf::from)
            .or_else(|| data_dir().map(|dir| dir.join("session.redb")))
    }
}

pub fn data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("adminbridge"))
}
