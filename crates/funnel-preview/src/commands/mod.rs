pub mod completion;
pub mod config;
pub mod export;
pub mod outline;
pub mod themes;

use crate::api::FunnelClient;
use crate::config::Config;

/// API client from config, with an optional `--server` override.
pub fn client(config: &Config, server: Option<&str>) -> FunnelClient {
    let base_url = server.unwrap_or_else(|| config.base_url());
    FunnelClient::new(base_url, config.session_cookie(), config.timeout())
}
