//! Error types for Yummy
//!
//! This module defines all error types used throughout the client,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Yummy operations
///
/// This enum covers configuration loading, session storage, backend
/// requests, avatar staging, and state machine violations.
#[derive(Error, Debug)]
pub enum YummyError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Session storage errors (file or keyring backend)
    #[error("Session error: {0}")]
    Session(String),

    /// Backend rejected the credential (401 or 403)
    #[error("Unauthorized: backend returned HTTP {0}")]
    Unauthorized(u16),

    /// Backend returned a non-success status other than 401/403
    #[error("API error: status={status}, {body}")]
    Api {
        /// HTTP status code returned by the backend
        status: u16,
        /// Response body, possibly truncated
        body: String,
    },

    /// Avatar staging errors (unreadable file, unsupported format)
    #[error("Avatar error: {0}")]
    Avatar(String),

    /// Operation is not accepted in the component's current state
    #[error("Not ready: {0}")]
    NotReady(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Keyring/credential storage errors
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

impl YummyError {
    /// Returns `true` when the error means the stored credential was rejected.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, YummyError::Unauthorized(_))
    }
}

/// Result type alias for Yummy operations
///
/// Uses `anyhow::Error` so call sites can attach context; downcast to
/// [`YummyError`] when the variant matters.
pub type Result<T> = anyhow::Result<T>;
