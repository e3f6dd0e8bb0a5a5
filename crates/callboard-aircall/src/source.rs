//! The call source seam.
//!
//! Pipelines depend on [`CallSource`] rather than on the HTTP client so they
//! can run against in-memory fakes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::time::Duration;

use callboard_models::{ArtifactKind, Call};

use crate::error::Result;

/// Read access to calls and their AI artifacts.
#[async_trait]
pub trait CallSource: Send + Sync {
    /// Checks that the credentials are accepted.
    async fn ping(&self, timeout: Duration) -> Result<()>;

    /// Most recent calls first, at most `limit`, optionally only those
    /// started after `since`.
    async fn recent_calls(
        &self,
        since: Option<DateTime<Utc>>,
        limit: u32,
        timeout: Duration,
    ) -> Result<Vec<Call>>;

    /// A single call by id, or `Ok(None)` when Aircall does not know it.
    async fn call(&self, call_id: u64, timeout: Duration) -> Result<Option<Call>>;

    /// One artifact payload, unwrapped from its envelope.
    ///
    /// Returns `Ok(None)` when Aircall has nothing for this call (HTTP 404).
    async fn artifact(
        &self,
        call_id: u64,
        kind: ArtifactKind,
        timeout: Duration,
    ) -> Result<Option<Value>>;
}
