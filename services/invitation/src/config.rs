//! Client configuration
//!
//! Values are layered: built-in defaults, then an optional `invitation.toml`
//! in the working directory, then `INVITATION_*` environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:3001";
pub const DEFAULT_GRAPHQL_PATH: &str = "/graphql";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid API base URL {url}: {reason}")]
    InvalidApiUrl { url: String, reason: String },
}

/// Type alias for Result with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppConfig {
    /// Base URL of the remote REST API
    pub api_base_url: String,
    /// Path of the GraphQL endpoint, relative to the base URL
    pub graphql_path: String,
    /// File used for durable session storage; in-memory when unset
    pub storage_path: Option<PathBuf>,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Default tracing filter when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            graphql_path: DEFAULT_GRAPHQL_PATH.to_string(),
            storage_path: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `invitation.toml` (if present) and the environment
    ///
    /// # Environment Variables
    /// - `INVITATION_API_BASE_URL`: REST API base URL (default: "http://127.0.0.1:3001")
    /// - `INVITATION_GRAPHQL_PATH`: GraphQL endpoint path (default: "/graphql")
    /// - `INVITATION_STORAGE_PATH`: session storage file (default: in-memory)
    /// - `INVITATION_REQUEST_TIMEOUT_SECS`: request timeout (default: 30)
    /// - `INVITATION_LOG_LEVEL`: tracing filter (default: "info")
    pub fn from_env() -> ConfigResult<Self> {
        Self::load(None)
    }

    /// Load configuration, reading `file` instead of the default location
    pub fn load(file: Option<&Path>) -> ConfigResult<Self> {
        let defaults = Self::default();

        let file_source = match file {
            Some(path) => File::from(path).required(true),
            None => File::with_name("invitation").required(false),
        };

        let config: Self = Config::builder()
            .set_default("api_base_url", defaults.api_base_url)?
            .set_default("graphql_path", defaults.graphql_path)?
            .set_default("request_timeout_secs", defaults.request_timeout_secs as i64)?
            .set_default("log_level", defaults.log_level)?
            .add_source(file_source)
            .add_source(Environment::with_prefix("INVITATION").try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Check values that cannot be expressed through deserialization alone
    pub fn validate(&self) -> ConfigResult<()> {
        let url = reqwest::Url::parse(&self.api_base_url).map_err(|e| {
            ConfigError::InvalidApiUrl {
                url: self.api_base_url.clone(),
                reason: e.to_string(),
            }
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidApiUrl {
                url: self.api_base_url.clone(),
                reason: "scheme must be http or https".to_string(),
            });
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEYS: [&str; 3] = [
        "INVITATION_API_BASE_URL",
        "INVITATION_REQUEST_TIMEOUT_SECS",
        "INVITATION_STORAGE_PATH",
    ];

    fn clear_env() {
        for key in KEYS {
            // SAFETY: tests touching the environment are serialized
            unsafe { std::env::remove_var(key) };
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = AppConfig::from_env().expect("Failed to load config");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        unsafe {
            std::env::set_var("INVITATION_API_BASE_URL", "https://api.wedding.test");
            std::env::set_var("INVITATION_REQUEST_TIMEOUT_SECS", "5");
            std::env::set_var("INVITATION_STORAGE_PATH", "/tmp/session.json");
        }

        let config = AppConfig::from_env().expect("Failed to load config");
        clear_env();

        assert_eq!(config.api_base_url, "https://api.wedding.test");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.storage_path, Some(PathBuf::from("/tmp/session.json")));
    }

    #[test]
    #[serial]
    fn test_rejects_invalid_url() {
        clear_env();
        unsafe { std::env::set_var("INVITATION_API_BASE_URL", "ftp://files.example") };
        let result = AppConfig::from_env();
        clear_env();

        assert!(matches!(result, Err(ConfigError::InvalidApiUrl { .. })));
    }
}
