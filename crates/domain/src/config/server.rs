use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use super::errors::ConfigError;

/// Standard DNS-over-TLS port (RFC 7858 §3.1).
pub const DEFAULT_DOT_PORT: u16 = 853;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Concurrent connection cap; 0 leaves concurrency unbounded
    #[serde(default)]
    pub max_connections: usize,

    #[serde(default = "default_listen_backlog")]
    pub listen_backlog: u32,

    #[serde(default = "default_handshake_timeout_secs")]
    pub handshake_timeout_secs: u64,

    /// How long a connection may sit between queries
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,

    /// Deadline for reading a payload or writing a response
    #[serde(default = "default_io_timeout_secs")]
    pub io_timeout_secs: u64,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let host = self
            .bind_address
            .trim()
            .trim_start_matches('[')
            .trim_end_matches(']');
        let ip = host.parse::<IpAddr>().map_err(|e| {
            ConfigError::Validation(format!(
                "Invalid bind address '{}': {}",
                self.bind_address, e
            ))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_secs(self.handshake_timeout_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn io_timeout(&self) -> Duration {
        Duration::from_secs(self.io_timeout_secs)
    }

    pub fn connection_limit(&self) -> Option<usize> {
        (self.max_connections > 0).then_some(self.max_connections)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            max_connections: 0,
            listen_backlog: default_listen_backlog(),
            handshake_timeout_secs: default_handshake_timeout_secs(),
            idle_timeout_secs: default_idle_timeout_secs(),
            io_timeout_secs: default_io_timeout_secs(),
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    DEFAULT_DOT_PORT
}

fn default_listen_backlog() -> u32 {
    1024
}

fn default_handshake_timeout_secs() -> u64 {
    10
}

fn default_idle_timeout_secs() -> u64 {
    30
}

fn default_io_timeout_secs() -> u64 {
    10
}
