//! stratus.toml configuration parser.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Console configuration, read from `stratus.toml`.
///
/// CLI flags override any value set here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Base URL of the orchestration backend, e.g. `http://127.0.0.1:8080`.
    pub api_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8080".to_string(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ConsoleConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ConsoleConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let config: ConsoleConfig = toml::from_str(
            r#"
            api_url = "http://backend:9000"
            timeout_secs = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.api_url, "http://backend:9000");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn timeout_defaults_when_absent() {
        let config: ConsoleConfig = toml::from_str(r#"api_url = "http://x""#).unwrap();
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn round_trips_through_toml() {
        let config = ConsoleConfig::default();
        let text = config.to_toml_string().unwrap();
        let back: ConsoleConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.api_url, config.api_url);
        assert_eq!(back.timeout_secs, config.timeout_secs);
    }
}
