//! CLI setup module
//!
//! Builds the AdminBridge client for CLI usage.

use std::sync::Arc;

use adminbridge_core::AdminBridge;
use adminbridge_storage::{MemorySessionStore, RedbSessionStore, SessionStore};
use anyhow::{Context, Result, anyhow};
use tracing::debug;

use crate::config::CliConfig;
use crate::prompt::{TerminalNavigator, TerminalPrompt};

pub fn open_session_store(config: &CliConfig) -> Result<Arc<dyn SessionStore>> {
    if config.session.ephemeral {
        debug!("Using in-memory session");
        return Ok(Arc::new(MemorySessionStore::new()));
    }

    let path = config
        .session_path()
        .ok_or_else(|| anyhow!("Could not determine a data directory for the session database"))?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let store = RedbSessionStore::open(&path)
        .with_context(|| format!("Failed to open session database {}", path.display()))?;
    debug!(path = %path.display(), "Opened session database");
    Ok(Arc::new(store))
}

/// Build the client wired to the terminal prompt and the session database
pub fn prepare_bridge(config: &CliConfig) -> Result<AdminBridge> {
    let store = open_session_store(config)?;
    let bridge = AdminBridge::new(
        config.client.clone(),
        store,
        Arc::new(TerminalPrompt),
        Arc::new(TerminalNavigator),
    )?;
    Ok(bridge)
}
