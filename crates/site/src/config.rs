//! Site configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `PORTFOLIO_HOST` - Bind address (default: 127.0.0.1)
//! - `PORTFOLIO_PORT` - Listen port (default: 3000)
//! - `PORTFOLIO_STORAGE` - `file`, `memory` or `none` (default: file)
//! - `PORTFOLIO_STORAGE_PATH` - File store location (default: data/portfolio-store.json)
//! - `PORTFOLIO_PREFERS_DARK` - Ambient dark-mode signal (`true`/`false`/`1`/`0`)
//! - `PORTFOLIO_SUBMIT_DELAY_MS` - Simulated contact delivery delay (default: 1000)
//! - `PORTFOLIO_STATIC_DIR` - Directory served under `/static` (default: crates/site/static)
//! - `PORTFOLIO_LOG_FORMAT` - `text` or `json` (default: text)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::environment::Environment;
use crate::storage::{BackendError, FileBackend, KeyValueBackend, MemoryBackend};

/// Default location of the file store, relative to the working directory.
pub const DEFAULT_STORAGE_PATH: &str = "data/portfolio-store.json";

/// Default static asset directory, relative to the workspace root.
pub const DEFAULT_STATIC_DIR: &str = "crates/site/static";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Which key-value backend the site persists to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    /// JSON file on disk.
    File(PathBuf),
    /// In-process map, lost on restart.
    Memory,
    /// No store at all; every storage call is a no-op.
    Disabled,
}

impl StorageConfig {
    /// Open the configured backend. `Disabled` yields `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file store exists but cannot be read.
    pub fn open(&self) -> Result<Option<Arc<dyn KeyValueBackend>>, BackendError> {
        let backend: Option<Arc<dyn KeyValueBackend>> = match self {
            Self::File(path) => Some(Arc::new(FileBackend::open(path.clone())?)),
            Self::Memory => Some(Arc::new(MemoryBackend::new())),
            Self::Disabled => None,
        };
        Ok(backend)
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Site application configuration.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Key-value backend selection
    pub storage: StorageConfig,
    /// Ambient "prefers dark" signal, if the deployment provides one
    pub prefers_dark: Option<bool>,
    /// Delay of the simulated contact delivery
    pub submit_delay: Duration,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions sent to Sentry
    pub sentry_traces_sample_rate: f32,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            storage: StorageConfig::File(PathBuf::from(DEFAULT_STORAGE_PATH)),
            prefers_dark: None,
            submit_delay: Duration::from_millis(1000),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            log_format: LogFormat::Text,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }
}

impl SiteConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any variable is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars(lookup);
        let defaults = Self::default();

        let storage_path = vars
            .optional("PORTFOLIO_STORAGE_PATH")
            .map_or_else(|| PathBuf::from(DEFAULT_STORAGE_PATH), PathBuf::from);
        let storage = match vars.optional("PORTFOLIO_STORAGE").as_deref() {
            None | Some("file") => StorageConfig::File(storage_path),
            Some("memory") => StorageConfig::Memory,
            Some("none") => StorageConfig::Disabled,
            Some(other) => {
                return Err(ConfigError::InvalidEnvVar(
                    "PORTFOLIO_STORAGE".to_string(),
                    format!("expected file, memory or none, got '{other}'"),
                ));
            }
        };

        let prefers_dark = vars
            .optional("PORTFOLIO_PREFERS_DARK")
            .map(|value| parse_bool("PORTFOLIO_PREFERS_DARK", &value))
            .transpose()?;

        let log_format = match vars.optional("PORTFOLIO_LOG_FORMAT").as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::InvalidEnvVar(
                    "PORTFOLIO_LOG_FORMAT".to_string(),
                    format!("expected text or json, got '{other}'"),
                ));
            }
        };

        Ok(Self {
            host: vars.parsed("PORTFOLIO_HOST", defaults.host)?,
            port: vars.parsed("PORTFOLIO_PORT", defaults.port)?,
            storage,
            prefers_dark,
            submit_delay: Duration::from_millis(vars.parsed("PORTFOLIO_SUBMIT_DELAY_MS", 1000)?),
            static_dir: vars
                .optional("PORTFOLIO_STATIC_DIR")
                .map_or(defaults.static_dir, PathBuf::from),
            log_format,
            sentry_dsn: vars.optional("SENTRY_DSN"),
            sentry_environment: vars.optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: vars.parsed("SENTRY_SAMPLE_RATE", defaults.sentry_sample_rate)?,
            sentry_traces_sample_rate: vars
                .parsed("SENTRY_TRACES_SAMPLE_RATE", defaults.sentry_traces_sample_rate)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Open the configured store and describe the environment the services
    /// run in.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured store cannot be opened.
    pub fn environment(&self) -> Result<Environment, BackendError> {
        let mut env = Environment::headless();
        if let Some(store) = self.storage.open()? {
            env = env.with_store(store);
        }
        if let Some(prefers_dark) = self.prefers_dark {
            env = env.with_prefers_dark(prefers_dark);
        }
        Ok(env)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup with typed accessors.
struct Vars<F>(F);

impl<F: Fn(&str) -> Option<String>> Vars<F> {
    /// Get an optional variable, treating blank values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parsed<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key).map_or(Ok(default), |value| {
            value
                .parse()
                .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected true, false, 1 or 0, got '{other}'"),
        )),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<SiteConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        SiteConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(
            config.storage,
            StorageConfig::File(PathBuf::from("data/portfolio-store.json"))
        );
        assert_eq!(config.prefers_dark, None);
        assert_eq!(config.submit_delay, Duration::from_secs(1));
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(config.sentry_dsn.is_none());
        assert!((config.sentry_sample_rate - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("PORTFOLIO_HOST", "0.0.0.0"),
            ("PORTFOLIO_PORT", "8080"),
            ("PORTFOLIO_STORAGE", "memory"),
            ("PORTFOLIO_PREFERS_DARK", "1"),
            ("PORTFOLIO_SUBMIT_DELAY_MS", "0"),
            ("PORTFOLIO_LOG_FORMAT", "json"),
            ("SENTRY_DSN", "https://key@sentry.example.com/1"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.storage, StorageConfig::Memory);
        assert_eq!(config.prefers_dark, Some(true));
        assert_eq!(config.submit_delay, Duration::ZERO);
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config.sentry_dsn.is_some());
    }

    #[test]
    fn test_storage_path_and_disabled() {
        let config = load(&[("PORTFOLIO_STORAGE_PATH", "/tmp/site.json")]).unwrap();
        assert_eq!(config.storage, StorageConfig::File(PathBuf::from("/tmp/site.json")));

        let config = load(&[("PORTFOLIO_STORAGE", "none")]).unwrap();
        assert_eq!(config.storage, StorageConfig::Disabled);
        assert!(config.storage.open().unwrap().is_none());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        for (key, value) in [
            ("PORTFOLIO_PORT", "http"),
            ("PORTFOLIO_HOST", "localhost:3000"),
            ("PORTFOLIO_STORAGE", "redis"),
            ("PORTFOLIO_PREFERS_DARK", "maybe"),
            ("PORTFOLIO_SUBMIT_DELAY_MS", "-5"),
            ("PORTFOLIO_LOG_FORMAT", "xml"),
            ("SENTRY_SAMPLE_RATE", "all"),
        ] {
            let err = load(&[(key, value)]).unwrap_err();
            assert!(
                matches!(&err, ConfigError::InvalidEnvVar(k, _) if k == key),
                "{key}={value} gave {err}"
            );
        }
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = load(&[("PORTFOLIO_PORT", "  "), ("PORTFOLIO_PREFERS_DARK", "")]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.prefers_dark, None);
    }

    #[test]
    fn test_environment_reflects_config() {
        let config = SiteConfig {
            storage: StorageConfig::Memory,
            prefers_dark: Some(false),
            ..SiteConfig::default()
        };

        let env = config.environment().unwrap();
        assert!(env.storage().is_available());
        assert_eq!(env.prefers_dark(), Some(false));
        assert!(env.display().is_none());
    }

    #[test]
    fn test_file_storage_opens_under_tempdir() {
        let dir = tempfile::tempdir().unwrap();
        let config = SiteConfig {
            storage: StorageConfig::File(dir.path().join("store.json")),
            ..SiteConfig::default()
        };

        let env = config.environment().unwrap();
        env.storage().set("theme", &"dark");
        assert!(dir.path().join("store.json").exists());
    }
}
