//! Error types for backend requests.

use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur talking to the backend.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base url {0:?}: {1}")]
    BaseUrl(String, String),

    #[error("connection to {0} failed: {1}")]
    Connect(String, String),

    #[error("request to {path} failed: {reason}")]
    Request { path: String, reason: String },

    #[error("request to {path} returned {status}")]
    Status { path: String, status: u16 },

    #[error("request to {path} timed out")]
    Timeout { path: String },

    #[error("response from {path} could not be decoded: {reason}")]
    Decode { path: String, reason: String },
}
