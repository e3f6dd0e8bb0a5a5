//! Run reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use callboard_models::RunId;

use crate::automation::Automation;

/// Counters for one run. Per-item failures end up in `failed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: RunId,
    pub automation: Automation,
    /// Sync profile name, for sync runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    pub processed: usize,
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Outcome of each step of a full run.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<StepOutcome>,
}

impl RunReport {
    /// Starts an empty report.
    pub fn start(automation: Automation, now: DateTime<Utc>) -> Self {
        Self {
            run_id: RunId::new(),
            automation,
            profile: None,
            processed: 0,
            created: 0,
            updated: 0,
            skipped: 0,
            failed: 0,
            started_at: now,
            finished_at: now,
            steps: Vec::new(),
        }
    }

    /// Stamps the end time.
    pub fn finish(mut self, now: DateTime<Utc>) -> Self {
        self.finished_at = now;
        self
    }

    /// Wall-clock duration in milliseconds.
    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }

    /// One-line French summary, used as the response message.
    pub fn summary(&self) -> String {
        format!(
            "{} terminée: {} traités, {} créés, {} mis à jour, {} ignorés, {} erreurs",
            self.automation.description(),
            self.processed,
            self.created,
            self.updated,
            self.skipped,
            self.failed
        )
    }

    /// Adds a step outcome, folding its counters into the totals.
    pub fn push_step(&mut self, step: StepOutcome) {
        if let Some(report) = &step.report {
            self.processed += report.processed;
            self.created += report.created;
            self.updated += report.updated;
            self.skipped += report.skipped;
            self.failed += report.failed;
        }
        self.steps.push(step);
    }
}

/// Result of one step of a full run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub automation: Automation,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<RunReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepOutcome {
    pub fn succeeded(report: RunReport) -> Self {
        Self {
            automation: report.automation,
            success: true,
            report: Some(report),
            error: None,
        }
    }

    pub fn failed(automation: Automation, error: impl ToString) -> Self {
        Self {
            automation,
            success: false,
            report: None,
            error: Some(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_push_step_accumulates() {
        let now = Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap();
        let mut full = RunReport::start(Automation::Full, now);

        let mut sync = RunReport::start(Automation::Sync, now);
        sync.processed = 3;
        sync.created = 2;
        sync.skipped = 1;
        full.push_step(StepOutcome::succeeded(sync));
        full.push_step(StepOutcome::failed(Automation::Link, "board not found: 1"));

        assert_eq!(full.processed, 3);
        assert_eq!(full.created, 2);
        assert_eq!(full.steps.len(), 2);
        assert!(!full.steps[1].success);
        assert_eq!(full.steps[1].error.as_deref(), Some("board not found: 1"));
    }

    #[test]
    fn test_summary_and_duration() {
        let start = Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap();
        let mut report = RunReport::start(Automation::Sync, start);
        report.created = 1;
        let report = report.finish(start + chrono::Duration::milliseconds(1500));
        assert_eq!(report.duration_ms(), 1500);
        assert!(report.summary().starts_with("Synchronisation Aircall terminée: 0 traités, 1 créés"));
    }
}
