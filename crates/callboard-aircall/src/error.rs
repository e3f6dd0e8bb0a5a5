//! Error types for Aircall requests.

use thiserror::Error;

/// Errors returned by the Aircall client.
#[derive(Error, Debug)]
pub enum AircallError {
    /// Transport failure or timeout.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Aircall answered with a non-success status.
    #[error("Aircall API error {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not have the expected shape.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// Invalid base URL or missing credentials.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl AircallError {
    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            AircallError::Status { status, .. } => Some(*status),
            AircallError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type alias for Aircall operations.
pub type Result<T> = std::result::Result<T, AircallError>;
