//! Crate error types

use thiserror::Error;

/// Errors that can occur while reading or writing configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Unknown configuration scope name
    #[error("Unknown config scope: {0}")]
    UnknownScope(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl ConfigError {
    /// Create a generic error from a string
    pub fn other(msg: impl Into<String>) -> Self {
        ConfigError::Other(msg.into())
    }
}

/// Result type alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
