//! Backend error types

use thiserror::Error;

/// Errors returned by a metrics backend call
#[derive(Error, Debug)]
pub enum BackendError {
    /// Backend could not be reached
    #[error("Backend unavailable")]
    Unavailable,

    /// Request exceeded the configured timeout
    #[error("Request timeout")]
    Timeout,

    /// Transport-level failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// No row matched the given id
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Response body did not match the expected row shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// Client could not be constructed from configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failure injected by the in-memory backend
    #[error("Injected failure: {0}")]
    Injected(String),
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::Decode(err.to_string())
    }
}

impl BackendError {
    /// Map a transport error onto timeout, unavailable or a generic request failure
    pub(crate) fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            BackendError::Timeout
        } else if e.is_connect() {
            BackendError::Unavailable
        } else {
            BackendError::Request(e)
        }
    }
}

/// Result type alias for backend operations
pub type BackendResult<T> = Result<T, BackendError>;
