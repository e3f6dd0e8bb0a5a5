//! Run monitoring: a bounded in-memory log and per-automation counters.
//!
//! Entries come from two places: runs triggered through this API, and
//! external scripts reporting through `POST /api/monitor/:stage/:name`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::str::FromStr;
use tracing::{error, info};

use crate::error::ApiError;

/// Lifecycle stage of a monitored run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitorStage {
    Start,
    Progress,
    Success,
    Error,
}

impl MonitorStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            MonitorStage::Start => "start",
            MonitorStage::Progress => "progress",
            MonitorStage::Success => "success",
            MonitorStage::Error => "error",
        }
    }

    /// Status recorded in log entries.
    pub fn status(&self) -> &'static str {
        match self {
            MonitorStage::Start => "STARTED",
            MonitorStage::Progress => "IN_PROGRESS",
            MonitorStage::Success => "COMPLETED",
            MonitorStage::Error => "FAILED",
        }
    }

    pub fn level(&self) -> &'static str {
        match self {
            MonitorStage::Start | MonitorStage::Progress => "INFO",
            MonitorStage::Success => "SUCCESS",
            MonitorStage::Error => "ERROR",
        }
    }
}

impl fmt::Display for MonitorStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MonitorStage {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(MonitorStage::Start),
            "progress" => Ok(MonitorStage::Progress),
            "success" => Ok(MonitorStage::Success),
            "error" => Ok(MonitorStage::Error),
            other => Err(ApiError::NotFound(format!("unknown monitor stage: {}", other))),
        }
    }
}

/// One monitor log line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: &'static str,
    pub automation: String,
    pub status: &'static str,
    pub message: String,
    pub data: Value,
}

impl LogEntry {
    pub fn new(stage: MonitorStage, automation: &str, data: Value) -> Self {
        let message = match stage {
            MonitorStage::Start => format!("🚀 Démarrage de {}", automation),
            MonitorStage::Progress => format!(
                "🔄 {} - {}",
                automation,
                data.get("step").and_then(Value::as_str).unwrap_or("Unknown")
            ),
            MonitorStage::Success => format!("✅ {} terminé avec succès", automation),
            MonitorStage::Error => format!(
                "❌ {} échoué: {}",
                automation,
                data.get("error").and_then(Value::as_str).unwrap_or("Unknown error")
            ),
        };
        Self {
            timestamp: Utc::now(),
            level: stage.level(),
            automation: automation.to_string(),
            status: stage.status(),
            message,
            data,
        }
    }
}

/// Counters for one automation name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AutomationStats {
    pub started: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub last_status: Option<&'static str>,
    pub last_update: Option<DateTime<Utc>>,
}

/// Bounded log plus counters keyed by automation name.
#[derive(Debug)]
pub struct MonitorLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    stats: BTreeMap<String, AutomationStats>,
}

impl MonitorLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity: capacity.max(1),
            stats: BTreeMap::new(),
        }
    }

    /// Appends an entry, dropping the oldest once full.
    pub fn record(&mut self, entry: LogEntry) -> LogEntry {
        match entry.level {
            "ERROR" => error!(automation = %entry.automation, status = entry.status, "{}", entry.message),
            _ => info!(automation = %entry.automation, status = entry.status, "{}", entry.message),
        }

        let stats = self.stats.entry(entry.automation.clone()).or_default();
        match entry.status {
            "STARTED" => stats.started += 1,
            "COMPLETED" => stats.succeeded += 1,
            "FAILED" => stats.failed += 1,
            _ => {}
        }
        stats.last_status = Some(entry.status);
        stats.last_update = Some(entry.timestamp);

        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry.clone());
        entry
    }

    /// Shorthand for [`LogEntry::new`] followed by [`MonitorLog::record`].
    pub fn log(&mut self, stage: MonitorStage, automation: &str, data: Value) -> LogEntry {
        self.record(LogEntry::new(stage, automation, data))
    }

    /// Newest entries first, optionally for one automation.
    pub fn recent(&self, automation: Option<&str>, limit: usize) -> Vec<LogEntry> {
        self.entries
            .iter()
            .rev()
            .filter(|e| automation.map_or(true, |a| e.automation == a))
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn stats(&self) -> &BTreeMap<String, AutomationStats> {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MonitorLog {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_LOG_CAPACITY)
    }
}

/// Data attached to a start entry.
pub fn start_data() -> Value {
    json!({ "start_time": Utc::now() })
}
