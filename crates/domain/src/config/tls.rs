use serde::Deserialize;

/// PEM files presented to DoT clients. Server-authenticated only.
#[derive(Debug, Clone, Deserialize)]
pub struct TlsConfig {
    #[serde(default = "default_cert_file")]
    pub cert_file: String,

    #[serde(default = "default_key_file")]
    pub key_file: String,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            cert_file: default_cert_file(),
            key_file: default_key_file(),
        }
    }
}

fn default_cert_file() -> String {
    "server.crt".to_string()
}

fn default_key_file() -> String {
    "server.key".to_string()
}
