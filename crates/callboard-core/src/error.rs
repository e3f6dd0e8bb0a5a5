//! Error types for configuration loading.

use thiserror::Error;

/// Errors that can occur while building a [`crate::Config`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("missing required setting: {0}")]
    Missing(String),

    /// A variable is set but cannot be parsed.
    #[error("invalid value for {var}: {value}")]
    Invalid { var: String, value: String },

    /// Unknown sync profile name.
    #[error("unknown sync profile: {0} (expected full, optimized, ultra or batch)")]
    UnknownProfile(String),

    /// Failed to read an env file.
    #[error("env file error: {0}")]
    EnvFile(#[from] dotenvy::Error),
}

/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
