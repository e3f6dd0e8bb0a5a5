//! Request DTOs for the API.

use serde::Deserialize;

/// Monitor entries returned when no limit is given.
pub const DEFAULT_LOGS_LIMIT: usize = 50;

/// Query parameters accepted by automation triggers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AutomationQuery {
    /// Profile preset name; the process profile when absent.
    pub profile: Option<String>,
}

/// Query parameters for listing monitor logs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogsQuery {
    /// Maximum entries returned, newest first.
    pub limit: Option<usize>,
    /// Only entries for this automation.
    pub automation: Option<String>,
}

impl LogsQuery {
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LOGS_LIMIT)
    }
}
