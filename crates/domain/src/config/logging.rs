use serde::Deserialize;

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error (case-insensitive)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of the human-readable format
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    /// Normalized level, falling back to `info` for unknown values.
    pub fn level_or_default(&self) -> &'static str {
        let wanted = self.level.trim().to_ascii_lowercase();
        LEVELS
            .iter()
            .find(|level| **level == wanted)
            .copied()
            .unwrap_or("info")
    }

    pub fn is_known_level(&self) -> bool {
        let wanted = self.level.trim().to_ascii_lowercase();
        LEVELS.contains(&wanted.as_str())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
