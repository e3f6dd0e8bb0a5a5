//! Error types for pipeline runs.

use thiserror::Error;

use callboard_aircall::AircallError;
use callboard_monday::MondayError;

/// Errors that abort a whole run.
///
/// Per-item failures never surface here; they are logged and counted in
/// the run report instead.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Aircall rejected the connection check.
    #[error("Aircall unavailable: {0}")]
    Aircall(#[from] AircallError),

    /// A board needed by the run could not be read.
    #[error("Monday.com unavailable: {0}")]
    Monday(#[from] MondayError),

    /// A required column is missing and could not be created.
    #[error("column not found: {0}")]
    MissingColumn(String),

    /// Unknown automation name.
    #[error("unknown automation: {0}")]
    UnknownAutomation(String),

    /// A schedule update was rejected.
    #[error("invalid schedule: {0}")]
    InvalidSchedule(String),
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, SyncError>;
