//! Client configuration management
//!
//! Handles loading configuration from TOML files, environment variables and
//! command-line overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid base URL '{0}'. Must start with http:// or https://")]
    InvalidBaseUrl(String),

    #[error("Invalid timeout: {0}. Must be a positive number of seconds")]
    InvalidTimeout(String),

    #[error("Configuration file error: {0}")]
    FileError(String),
}

/// Log levels supported by the front-ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_filter_str())
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        LogLevel::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend base URL
    pub base_url: String,
    /// Local storage file holding the session token
    pub storage_path: PathBuf,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Log level
    pub log_level: LogLevel,
    /// Log file; the TUI only logs when this is set
    pub log_file: Option<PathBuf>,
}

/// Environment variable names
pub mod env {
    pub const BASE_URL: &str = "RAILBOOK_BASE_URL";
    pub const STORAGE: &str = "RAILBOOK_STORAGE";
    pub const TIMEOUT_SECS: &str = "RAILBOOK_TIMEOUT_SECS";
    pub const LOG_LEVEL: &str = "RAILBOOK_LOG_LEVEL";
    pub const LOG_FILE: &str = "RAILBOOK_LOG_FILE";
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            storage_path: PathBuf::from(".railbook/local_storage.json"),
            timeout_secs: 30,
            log_level: LogLevel::Info,
            log_file: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))
    }

    /// Apply overrides from a variable lookup
    ///
    /// Separated from the process environment so tests stay hermetic.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(env::BASE_URL) {
            self.base_url = url;
        }
        if let Some(path) = lookup(env::STORAGE) {
            self.storage_path = PathBuf::from(path);
        }
        if let Some(secs) = lookup(env::TIMEOUT_SECS) {
            self.timeout_secs = secs
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(secs.clone()))?;
        }
        if let Some(level) = lookup(env::LOG_LEVEL) {
            self.log_level = LogLevel::from_str(&level)?;
        }
        if let Some(path) = lookup(env::LOG_FILE) {
            self.log_file = Some(PathBuf::from(path));
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::InvalidBaseUrl(self.base_url.clone()));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(self.timeout_secs.to_string()));
        }

        Ok(())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliArgs) -> Result<(), ConfigError> {
        if let Some(url) = &cli.base_url {
            self.base_url = url.clone();
        }
        if let Some(path) = &cli.storage_path {
            self.storage_path = path.clone();
        }
        if let Some(level) = &cli.log_level {
            self.log_level = LogLevel::from_str(level)?;
        }
        if let Some(path) = &cli.log_file {
            self.log_file = Some(path.clone());
        }
        Ok(())
    }
}

/// Command-line overrides shared by both front-ends
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Config file path
    pub config_file: Option<PathBuf>,
    /// Base URL override
    pub base_url: Option<String>,
    /// Storage file override
    pub storage_path: Option<PathBuf>,
    /// Log level override
    pub log_level: Option<String>,
    /// Log file override
    pub log_file: Option<PathBuf>,
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file, read only when `config_file` names one; a missing file is an error
/// 4. Default values
pub fn build_config(cli: &CliArgs) -> Result<ClientConfig, ConfigError> {
    build_config_with(cli, |key| std::env::var(key).ok())
}

/// [`build_config`] with an explicit environment lookup
pub fn build_config_with<F>(cli: &CliArgs, lookup: F) -> Result<ClientConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match &cli.config_file {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::default(),
    };

    config.apply_env(lookup)?;
    config.merge_with_cli(cli)?;
    config.validate()?;

    Ok(config)
}
