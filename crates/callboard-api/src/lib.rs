//! HTTP surface for Callboard.
//!
//! This crate exposes the automations over REST:
//! - Automation triggers (`/api/automation/:name`, with an optional profile)
//! - Schedule inspection, checks, manual triggers and updates
//! - Run monitoring, fed by triggered runs and by external scripts
//!
//! # Example
//!
//! ```ignore
//! use callboard_api::{serve, ApiConfig, AppState};
//! use callboard_sync::Pipelines;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pipelines = Pipelines::new(/* ... */);
//!     let state = AppState::new(ApiConfig::default(), pipelines);
//!
//!     serve(ApiConfig::default(), state).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod monitor;
pub mod router;
pub mod state;
pub mod types;

#[cfg(test)]
mod testing;

pub use config::ApiConfig;
pub use error::{ApiError, Result};
pub use monitor::{LogEntry, MonitorLog, MonitorStage};
pub use router::{create_router, serve, serve_with_shutdown};
pub use state::AppState;
