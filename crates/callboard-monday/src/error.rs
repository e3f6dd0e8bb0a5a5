//! Error types for Monday.com requests.

use thiserror::Error;

/// Errors returned by the Monday.com client.
#[derive(Error, Debug)]
pub enum MondayError {
    /// Transport failure or timeout.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status.
    #[error("Monday API error {status}: {body}")]
    Status { status: u16, body: String },

    /// HTTP 200 carrying a GraphQL `errors` array.
    #[error("GraphQL error: {0}")]
    GraphQl(String),

    /// The response did not contain the expected data.
    #[error("unexpected response: {0}")]
    Parse(String),

    /// The requested board does not exist or is not visible to the token.
    #[error("board not found: {0}")]
    BoardNotFound(String),

    /// Missing token or invalid endpoint.
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Result type alias for Monday.com operations.
pub type Result<T> = std::result::Result<T, MondayError>;
