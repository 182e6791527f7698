use serde::Deserialize;
use std::time::Duration;

use super::errors::ConfigError;
use crate::UpstreamAddr;

/// The single plaintext UDP resolver every query is forwarded to.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_server")]
    pub server: String,

    /// Whole-exchange timeout for one upstream round-trip
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl UpstreamConfig {
    pub fn addr(&self) -> Result<UpstreamAddr, ConfigError> {
        self.server
            .parse::<UpstreamAddr>()
            .map_err(ConfigError::Validation)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_server() -> String {
    "8.8.8.8".to_string()
}

fn default_timeout_secs() -> u64 {
    5
}
