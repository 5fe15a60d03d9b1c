//! Error types for learnpath

use thiserror::Error;

/// Result type alias using LearnPathError
pub type Result<T> = std::result::Result<T, LearnPathError>;

/// Error type alias for convenience
pub type Error = LearnPathError;

/// Exit codes for CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const NOT_FOUND: i32 = 2;
    pub const INVALID_INPUT: i32 = 3;
}

/// Main error type for learnpath
#[derive(Debug, Error)]
pub enum LearnPathError {
    /// Required credential or setting missing. Fatal at construction time;
    /// the affected backend must not serve requests in this state.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network/HTTP failure talking to an external service. Surfaced
    /// immediately, never retried inside the component that hit it.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// An outbound call exceeded its configured deadline. Kept distinct
    /// from [`LearnPathError::Http`] so callers can back off or fail fast.
    #[error("Timeout talking to {0}")]
    Timeout(String),

    /// Model output failed JSON parsing or schema validation. Retried by
    /// the structured-output client up to its cap; terminal once exhausted,
    /// carrying the last specific violation.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Index error: {0}")]
    Index(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("External service error: {0}")]
    External(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl LearnPathError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound(_) => exit_codes::NOT_FOUND,
            Self::Config(_) | Self::InvalidInput(_) => exit_codes::INVALID_INPUT,
            _ => exit_codes::GENERAL_ERROR,
        }
    }

    /// Classify a reqwest failure, separating deadline expiry from other
    /// transport problems.
    pub fn from_transport(err: reqwest::Error, target: &str) -> Self {
        if err.is_timeout() {
            Self::Timeout(target.to_string())
        } else {
            Self::Http(err)
        }
    }
}
