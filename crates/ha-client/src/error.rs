//! Errors returned by the Home Assistant client

use reqwest::StatusCode;
use thiserror::Error;

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured base URL cannot carry a path
    #[error("invalid Home Assistant URL '{0}'")]
    InvalidUrl(String),

    /// Transport failure, timeout, or client construction error
    #[error("request to Home Assistant failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Home Assistant answered with a non-success status
    #[error("Home Assistant returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// The response body was not the JSON we expected
    #[error("invalid response from Home Assistant: {0}")]
    Decode(#[from] serde_json::Error),
}
