use serde::Deserialize;

use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::server::ServerConfig;
use super::tls::TlsConfig;
use super::upstream::UpstreamConfig;

const LOCAL_CONFIG_PATH: &str = "ferrous-dot.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/ferrous-dot/config.toml";

/// Main configuration structure for Ferrous DoT
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Listener configuration (bind address, port, limits, deadlines)
    #[serde(default)]
    pub server: ServerConfig,

    /// Certificate and key presented to clients
    #[serde(default)]
    pub tls: TlsConfig,

    /// Upstream resolver
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. ferrous-dot.toml in current directory
    /// 3. /etc/ferrous-dot/config.toml
    /// 4. Default configuration
    ///
    /// Command-line overrides are applied on top and the result is validated.
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::get_config_path() {
                Some(found) => Self::from_file(&found)?,
                None => Self::default(),
            },
        };

        config.apply_cli_overrides(cli_overrides);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply command-line overrides to configuration
    pub fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(max) = overrides.max_connections {
            self.server.max_connections = max;
        }
        if let Some(cert) = overrides.cert_file {
            self.tls.cert_file = cert;
        }
        if let Some(key) = overrides.key_file {
            self.tls.key_file = key;
        }
        if let Some(upstream) = overrides.upstream {
            self.upstream.server = upstream;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("DoT port cannot be 0".to_string()));
        }

        self.server.socket_addr()?;

        if self.tls.cert_file.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Certificate file path is empty".to_string(),
            ));
        }

        if self.tls.key_file.trim().is_empty() {
            return Err(ConfigError::Validation("Key file path is empty".to_string()));
        }

        self.upstream.addr()?;

        let timeouts = [
            ("upstream.timeout_secs", self.upstream.timeout_secs),
            ("server.handshake_timeout_secs", self.server.handshake_timeout_secs),
            ("server.idle_timeout_secs", self.server.idle_timeout_secs),
            ("server.io_timeout_secs", self.server.io_timeout_secs),
        ];
        for (name, secs) in timeouts {
            if secs == 0 {
                return Err(ConfigError::Validation(format!("{} must be > 0", name)));
            }
        }

        Ok(())
    }

    /// Get the path to the configuration file being used
    pub fn get_config_path() -> Option<String> {
        [LOCAL_CONFIG_PATH, SYSTEM_CONFIG_PATH]
            .into_iter()
            .find(|path| std::path::Path::new(path).exists())
            .map(str::to_string)
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub max_connections: Option<usize>,
    pub cert_file: Option<String>,
    pub key_file: Option<String>,
    pub upstream: Option<String>,
    pub log_level: Option<String>,
}
