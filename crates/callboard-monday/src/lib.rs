//! Monday.com client for Callboard.
//!
//! [`MondayClient`] speaks the Monday.com GraphQL API. Pipelines depend on
//! the [`BoardStore`] trait, which also provides paging helpers built on
//! top of `items_page`.

pub mod client;
pub mod error;
pub mod store;

pub use client::MondayClient;
pub use error::{MondayError, Result};
pub use store::{BoardStore, PAGE_SIZE};
