//! Application configuration
//!
//! Loaded from a TOML file (`~/.config/kommunalka/config.toml` by
//! default, overridable via the `KOMMUNALKA_CONFIG` environment
//! variable). Every section and key has a default, so a partial file —
//! or no file at all — is valid.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::shared::utills::retry::RetryConfig;

/// Default path of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kommunalka")
        .join("config.toml")
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSettings,
    pub logging: LoggingConfig,
    pub billing: BillingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn api_address(&self) -> String {
        format!("{}:{}", self.server.api_host, self.server.api_port)
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub api_host: String,
    pub api_port: u16,
    /// Seconds to wait for in-flight requests during shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_host: "0.0.0.0".to_string(),
            api_port: 8080,
            shutdown_timeout: 30,
        }
    }
}

/// Database settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "sqlite://./kommunalka.db?mode=rwc".to_string(),
        }
    }
}

impl DatabaseSettings {
    pub fn connection_url(&self) -> String {
        self.url.clone()
    }
}

/// Logging settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Retry policy for billing runs hitting transient storage errors.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BillingConfig {
    pub retry_max_attempts: u32,
    pub retry_initial_delay_ms: u64,
    pub retry_backoff_multiplier: f64,
    pub retry_max_delay_ms: u64,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            retry_max_attempts: 3,
            retry_initial_delay_ms: 200,
            retry_backoff_multiplier: 2.0,
            retry_max_delay_ms: 5_000,
        }
    }
}

impl BillingConfig {
    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_attempts: self.retry_max_attempts,
            initial_delay: Duration::from_millis(self.retry_initial_delay_ms),
            backoff_multiplier: self.retry_backoff_multiplier,
            max_delay: Duration::from_millis(self.retry_max_delay_ms),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();

        assert_eq!(config.server.api_host, "0.0.0.0");
        assert_eq!(config.server.api_port, 8080);
        assert_eq!(config.server.shutdown_timeout, 30);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.billing.retry_max_attempts, 3);
        assert!(config.database.url.starts_with("sqlite://"));
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            api_port = 9090

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.api_port, 9090);
        assert_eq!(config.server.api_host, "0.0.0.0");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.billing.retry_backoff_multiplier, 2.0);
    }

    #[test]
    fn full_file_parses_every_section() {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            api_host = "127.0.0.1"
            api_port = 3000
            shutdown_timeout = 10

            [database]
            url = "sqlite::memory:"

            [logging]
            level = "warn"

            [billing]
            retry_max_attempts = 5
            retry_initial_delay_ms = 50
            retry_backoff_multiplier = 1.5
            retry_max_delay_ms = 1000
            "#,
        )
        .unwrap();

        assert_eq!(config.api_address(), "127.0.0.1:3000");
        assert_eq!(config.database.connection_url(), "sqlite::memory:");
        let retry = config.billing.retry_config();
        assert_eq!(retry.max_attempts, 5);
        assert_eq!(retry.initial_delay, Duration::from_millis(50));
        assert_eq!(retry.max_delay, Duration::from_millis(1000));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = toml::from_str::<AppConfig>("server = not valid").unwrap_err();

        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn load_from_missing_file_is_an_io_error() {
        let err = AppConfig::load(Path::new("/nonexistent/kommunalka/config.toml")).unwrap_err();

        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn default_path_ends_with_app_directory() {
        let path = default_config_path();

        assert!(path.ends_with("kommunalka/config.toml"));
    }
}
