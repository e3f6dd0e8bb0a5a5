//! Core business logic for Callboard.
//!
//! This crate holds everything that does not talk to the network:
//! - `phone`: French phone number normalization and matching
//! - `format`: rendering of calls and AI artifacts into board columns
//! - `columns`: logical column names and their board ids
//! - `profile`: sync run limits
//! - `config`: process configuration loaded from the environment

pub mod columns;
pub mod config;
pub mod error;
pub mod format;
pub mod phone;
pub mod profile;

pub use columns::{CallColumns, CallField, ColumnIds, TaskColumns};
pub use config::{
    Agent, AgentDirectory, AircallConfig, BoardIds, Config, MondayConfig, OwnerKind, ServerConfig,
};
pub use error::{ConfigError, Result};
pub use format::{ArtifactTexts, NOT_AVAILABLE};
pub use phone::{format_display, normalize, phones_match};
pub use profile::SyncProfile;
