//! Response DTOs for the API.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use callboard_sync::{EntryStatus, RunReport, StepOutcome};

use crate::monitor::{AutomationStats, LogEntry};

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Uptime in seconds.
    pub uptime_seconds: u64,
}

/// Result of one triggered automation.
///
/// A run that could not complete is still a 200 with `success: false`.
#[derive(Debug, Clone, Serialize)]
pub struct RunResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<RunReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One automation as listed by the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct AutomationInfo {
    pub name: String,
    pub description: String,
    pub endpoint: String,
    pub last_status: Option<String>,
    pub last_run: Option<DateTime<Utc>>,
}

/// Automation status response.
#[derive(Debug, Clone, Serialize)]
pub struct AutomationStatusResponse {
    pub success: bool,
    pub timestamp: DateTime<Utc>,
    pub automations: Vec<AutomationInfo>,
}

/// Schedule status response.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleStatusResponse {
    pub success: bool,
    pub timestamp: DateTime<Utc>,
    /// Local time the table was evaluated at.
    pub current_time: NaiveDateTime,
    pub schedules: Vec<EntryStatus>,
}

/// Result of a schedule check.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleCheckResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub checked_at: NaiveDateTime,
    pub executed: Vec<StepOutcome>,
}

/// Result of a schedule update.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleUpdateResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub schedule: EntryStatus,
}

/// Result of a monitor report.
#[derive(Debug, Clone, Serialize)]
pub struct MonitorResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub entry: LogEntry,
}

/// Monitor log listing.
#[derive(Debug, Clone, Serialize)]
pub struct LogsResponse {
    pub success: bool,
    pub timestamp: DateTime<Utc>,
    pub total: usize,
    pub logs: Vec<LogEntry>,
}

/// Per-automation monitor counters.
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub timestamp: DateTime<Utc>,
    pub stats: BTreeMap<String, AutomationStats>,
}
