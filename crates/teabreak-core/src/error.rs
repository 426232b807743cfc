//! Error types for the TeaBreak client.

use thiserror::Error;

/// Result type alias using TeaBreak's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for TeaBreak client operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Backend answered with a non-success envelope code
    #[error("Backend error {code}: {message}")]
    Backend { code: i64, message: String },

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No signed-in user
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Signed in, but the role does not allow the operation
    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl Error {
    /// Build a backend error from an envelope code and optional message.
    pub fn backend(code: i64, message: Option<String>) -> Self {
        Error::Backend {
            code,
            message: message.unwrap_or_else(|| "no message".to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}
