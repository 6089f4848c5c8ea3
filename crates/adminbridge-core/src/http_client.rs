use reqwest::Client;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

const DISABLE_SYSTEM_PROXY_ENV: &str = "ADMINBRIDGE_DISABLE_SYSTEM_PROXY";

pub(crate) fn build_http_client(config: &ClientConfig) -> Result<Client> {
    let mut builder = Client::builder().timeout(config.timeout());

    if should_disable_system_proxy() {
        builder = builder.no_proxy();
    }

    builder
        .build()
        .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {}", e)))
}

fn should_disable_system_proxy() -> bool {
    if std::env::var_os(DISABLE_SYSTEM_PROXY_ENV).is_some() {
        return true;
    }

    cfg!(test)
}
