//! Error types for Acumen

use thiserror::Error;

/// Result type alias using Acumen's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Acumen
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reasoning service (OpenAI-compatible API) error
    #[error("Reasoning API error: {0}")]
    Reasoning(String),

    /// Search backend (Glean REST API) error
    #[error("Glean API error ({status}): {message}")]
    Search { status: u16, message: String },

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error
    #[error("Environment error: {0}")]
    Env(#[from] std::env::VarError),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unauthorized access
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),
}

impl Error {
    /// Check if error is a client error (user's fault)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidInput(_) | Error::NotFound(_) | Error::Unauthorized(_)
        )
    }

    /// True for errors that abort startup instead of flowing back into the
    /// conversation as text.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}
