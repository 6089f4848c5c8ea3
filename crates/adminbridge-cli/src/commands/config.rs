use anyhow::Result;

use crate::config::CliConfig;
use crate::output::{OutputFormat, json::print_json, table::print_fields};

pub fn show(config: &CliConfig, format: OutputFormat) -> Result<()> {
    if format.is_json() {
        return print_json(config);
    }

    let session = if config.session.ephemeral {
        "(in memory)".to_string()
    } else {
        config
            .session_path()
            .map(|path| path.display().to_string())
            .unwrap_or_default()
    };

    print_fields(&[
        (
            "Config file",
            CliConfig::default_path()
                .map(|path| path.display().to_string())
                .unwrap_or_default(),
        ),
        ("Base URL", config.client.base_url.clone()),
        ("Timeout (ms)", config.client.timeout_ms.to_string()),
        ("Asset base", config.client.asset_base().to_string()),
        ("Login entry", config.client.login_entry.clone()),
        ("Session", session),
    ])
}
