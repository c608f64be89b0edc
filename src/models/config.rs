//! Configuration model loaded from external sources.

use serde::Deserialize;

fn default_backend_timeout_secs() -> u64 {
    30
}

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub templates_dir: String,
    pub secret: String,
    pub auth_service_url: String,
    /// Base URL of the accounting backend serving assignments and documents.
    pub backend_url: String,
    #[serde(default = "default_backend_timeout_secs")]
    pub backend_timeout_secs: u64,
}
