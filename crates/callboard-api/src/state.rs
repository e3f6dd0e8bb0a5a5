//! Application state shared across handlers.

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde_json::json;
use tokio::sync::RwLock;

use callboard_core::SyncProfile;
use callboard_sync::{
    Automation, LocalClock, Pipelines, RunObserver, RunReport, Schedule, StepOutcome,
};

use crate::config::ApiConfig;
use crate::monitor::{start_data, MonitorLog, MonitorStage};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: Arc<ApiConfig>,
    /// Automation runner.
    pub pipelines: Pipelines,
    /// Schedule table, shared with the background scheduler when one runs.
    pub schedule: Arc<RwLock<Schedule>>,
    /// Run log and counters.
    pub monitor: Arc<RwLock<MonitorLog>>,
    clock: LocalClock,
}

impl AppState {
    /// Creates a new AppState with the default schedule.
    pub fn new(config: ApiConfig, pipelines: Pipelines) -> Self {
        let capacity = config.log_capacity;
        Self {
            config: Arc::new(config),
            pipelines,
            schedule: Arc::new(RwLock::new(Schedule::new())),
            monitor: Arc::new(RwLock::new(MonitorLog::new(capacity))),
            clock: Arc::new(|| chrono::Local::now().naive_local()),
        }
    }

    /// Uses an existing schedule table.
    pub fn with_schedule(mut self, schedule: Arc<RwLock<Schedule>>) -> Self {
        self.schedule = schedule;
        self
    }

    /// Replaces the local clock used for schedule checks.
    pub fn with_clock(mut self, clock: LocalClock) -> Self {
        self.clock = clock;
        self
    }

    /// Current local time.
    pub fn local_now(&self) -> NaiveDateTime {
        (self.clock)()
    }

    /// Profile configured for the process.
    pub fn default_profile(&self) -> SyncProfile {
        self.pipelines.config().profile.clone()
    }

    /// Runs an automation and records its start and outcome in the monitor.
    pub async fn run(
        &self,
        automation: Automation,
        profile: &SyncProfile,
    ) -> callboard_sync::Result<RunReport> {
        let name = automation.as_str();
        self.monitor
            .write()
            .await
            .log(MonitorStage::Start, name, start_data());

        let result = self.pipelines.run(automation, profile).await;

        let mut monitor = self.monitor.write().await;
        match &result {
            Ok(report) => {
                monitor.log(MonitorStage::Success, name, report_data(report));
            }
            Err(e) => {
                monitor.log(MonitorStage::Error, name, json!({ "error": e.to_string() }));
            }
        }
        result
    }

    /// Records a run made outside the request path, such as a scheduled one.
    pub async fn record_outcome(&self, outcome: &StepOutcome) {
        let name = outcome.automation.as_str();
        let mut monitor = self.monitor.write().await;
        match (&outcome.report, &outcome.error) {
            (Some(report), _) if outcome.success => {
                monitor.log(MonitorStage::Success, name, report_data(report));
            }
            (_, error) => {
                let error = error.as_deref().unwrap_or("Unknown error");
                monitor.log(MonitorStage::Error, name, json!({ "error": error }));
            }
        }
    }

    /// Observer for the background scheduler that feeds the monitor.
    pub fn observer(&self) -> RunObserver {
        let state = self.clone();
        Arc::new(move |outcome: &StepOutcome| {
            let state = state.clone();
            let outcome = outcome.clone();
            tokio::spawn(async move { state.record_outcome(&outcome).await });
        })
    }
}

fn report_data(report: &RunReport) -> serde_json::Value {
    json!({
        "result": report.summary(),
        "processed": report.processed,
        "created": report.created,
        "updated": report.updated,
        "skipped": report.skipped,
        "failed": report.failed,
        "duration_ms": report.duration_ms(),
    })
}
