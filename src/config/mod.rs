//! Configuration management.

mod file_config;

pub use file_config::{
    default_config_path, default_log_path, find_config_file, load_config, save_config,
};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::sources::{DEFAULT_COVER_ENDPOINT, DEFAULT_SEARCH_ENDPOINT};

/// Prefix for environment variable overrides (`BOOK_FINDER__SEARCH__DEBOUNCE_MS`)
pub const ENV_PREFIX: &str = "BOOK_FINDER";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Remote API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Search behaviour
    #[serde(default)]
    pub search: SearchConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Check that endpoints are usable URLs
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("api.search_endpoint", &self.api.search_endpoint),
            ("api.cover_endpoint", &self.api.cover_endpoint),
        ] {
            let url = url::Url::parse(value)
                .map_err(|e| ConfigError::Invalid(format!("{} '{}': {}", name, value, e)))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ConfigError::Invalid(format!(
                    "{} must be an http(s) URL, got '{}'",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Remote API configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Title search endpoint
    #[serde(default = "default_search_endpoint")]
    pub search_endpoint: String,

    /// Host serving cover images
    #[serde(default = "default_cover_endpoint")]
    pub cover_endpoint: String,

    /// Custom User-Agent header
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Request timeout; unset leaves the transport default in place
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            search_endpoint: default_search_endpoint(),
            cover_endpoint: default_cover_endpoint(),
            user_agent: None,
            timeout_seconds: None,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

fn default_search_endpoint() -> String {
    DEFAULT_SEARCH_ENDPOINT.to_string()
}

fn default_cover_endpoint() -> String {
    DEFAULT_COVER_ENDPOINT.to_string()
}

/// Search configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period before typed input is committed, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

fn default_debounce_ms() -> u64 {
    600
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter level when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,

    /// Log file used by the interactive UI
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.search_endpoint, "https://openlibrary.org/search.json");
        assert_eq!(config.api.cover_endpoint, "https://covers.openlibrary.org");
        assert_eq!(config.api.timeout(), None);
        assert_eq!(config.search.debounce(), Duration::from_millis(600));
        assert_eq!(config.logging.format, LogFormat::Text);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_endpoint() {
        let mut config = Config::default();
        config.api.search_endpoint = "not a url".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.api.search_endpoint = "ftp://example.com/search.json".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
