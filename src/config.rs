//! Configuration management for Yummy
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{Result, YummyError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for Yummy
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Backend API settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Where the session credentials are persisted
    #[serde(default)]
    pub session: SessionConfig,
    /// Profile display settings
    #[serde(default)]
    pub profile: ProfileConfig,
    /// Email-verification landing page settings
    #[serde(default)]
    pub verification: VerificationConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Origin of the backend, every endpoint path is joined onto it
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Session storage configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SessionConfig {
    /// Storage backend for the access and refresh credentials
    #[serde(default)]
    pub backend: SessionBackend,

    /// Override for the session file (file backend only)
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Session storage backend
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionBackend {
    /// JSON file in the user's data directory
    #[default]
    File,
    /// OS native credential store
    Keyring,
    /// Process memory only, lost on exit
    Memory,
}

impl std::str::FromStr for SessionBackend {
    type Err = YummyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" => Ok(SessionBackend::File),
            "keyring" => Ok(SessionBackend::Keyring),
            "memory" => Ok(SessionBackend::Memory),
            other => Err(YummyError::Config(format!(
                "Invalid session backend: {}. Must be one of: file, keyring, memory",
                other
            ))),
        }
    }
}

/// Profile display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// File name the backend uses for "no user-supplied avatar"
    #[serde(default = "default_image_sentinel")]
    pub default_image_sentinel: String,
}

fn default_image_sentinel() -> String {
    "default.png".to_string()
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            default_image_sentinel: default_image_sentinel(),
        }
    }
}

/// Email-verification landing page configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationConfig {
    /// Countdown before redirecting to the login view (seconds)
    #[serde(default = "default_redirect_seconds")]
    pub redirect_seconds: u32,
}

fn default_redirect_seconds() -> u32 {
    5
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            redirect_seconds: default_redirect_seconds(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| YummyError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| YummyError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var("YUMMY_API_BASE_URL") {
            self.api.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("YUMMY_API_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.api.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid YUMMY_API_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(backend) = std::env::var("YUMMY_SESSION_BACKEND") {
            match backend.parse() {
                Ok(value) => self.session.backend = value,
                Err(e) => tracing::warn!("{}, keeping {:?}", e, self.session.backend),
            }
        }

        if let Ok(path) = std::env::var("YUMMY_SESSION_PATH") {
            self.session.path = Some(PathBuf::from(path));
        }

        if let Ok(sentinel) = std::env::var("YUMMY_DEFAULT_IMAGE") {
            self.profile.default_image_sentinel = sentinel;
        }

        if let Ok(seconds) = std::env::var("YUMMY_REDIRECT_SECONDS") {
            if let Ok(value) = seconds.parse() {
                self.verification.redirect_seconds = value;
            } else {
                tracing::warn!("Invalid YUMMY_REDIRECT_SECONDS: {}", seconds);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let Some(base) = &cli.api_base {
            tracing::debug!(base_url = %base, "CLI override: --api-base");
            self.api.base_url = base.clone();
        }

        if let Some(path) = &cli.session_path {
            tracing::debug!(path = %path.display(), "CLI override: --session-path");
            self.session.path = Some(path.clone());
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.api.base_url).map_err(|e| {
            YummyError::Config(format!("Invalid api.base_url {}: {}", self.api.base_url, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(YummyError::Config(format!(
                "api.base_url must use http or https, got {}",
                url.scheme()
            ))
            .into());
        }

        if self.api.timeout_seconds == 0 || self.api.timeout_seconds > 300 {
            return Err(YummyError::Config(
                "api.timeout_seconds must be between 1 and 300".to_string(),
            )
            .into());
        }

        if self.profile.default_image_sentinel.trim().is_empty() {
            return Err(YummyError::Config(
                "profile.default_image_sentinel cannot be empty".to_string(),
            )
            .into());
        }

        if self.verification.redirect_seconds > 60 {
            return Err(YummyError::Config(
                "verification.redirect_seconds must be less than or equal to 60".to_string(),
            )
            .into());
        }

        Ok(())
    }
}
