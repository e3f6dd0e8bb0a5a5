//! Aircall client for Callboard.
//!
//! [`AircallClient`] talks to the Aircall REST API; [`CallSource`] is the
//! trait the pipelines consume so they can be exercised without a network.

pub mod client;
pub mod error;
pub mod source;

pub use client::AircallClient;
pub use error::{AircallError, Result};
pub use source::CallSource;
