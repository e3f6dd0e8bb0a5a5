//! Pipeline entry point.
//!
//! [`Pipelines`] owns the collaborators every automation needs and routes an
//! [`Automation`] to the matching run. Each run is a sequential batch: one
//! vendor request in flight at a time, per-item failures logged and counted.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{error, info};

use callboard_aircall::CallSource;
use callboard_core::{Config, SyncProfile};
use callboard_monday::BoardStore;

use crate::automation::Automation;
use crate::error::{Result, SyncError};
use crate::report::{RunReport, StepOutcome};

/// Source of the current time.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Runs automations against a call source and a board store.
#[derive(Clone)]
pub struct Pipelines {
    pub(crate) source: Arc<dyn CallSource>,
    pub(crate) store: Arc<dyn BoardStore>,
    pub(crate) config: Arc<Config>,
    clock: Clock,
}

impl Pipelines {
    pub fn new(
        source: Arc<dyn CallSource>,
        store: Arc<dyn BoardStore>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            source,
            store,
            config,
            clock: Arc::new(Utc::now),
        }
    }

    /// Replaces the wall clock, for tests.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Runs one automation to completion.
    ///
    /// An `Err` means the run could not start (a vendor was unreachable or
    /// a required column is missing). A `full` run never fails as a whole;
    /// each step's outcome is recorded in the report instead.
    pub async fn run(&self, automation: Automation, profile: &SyncProfile) -> Result<RunReport> {
        info!(automation = %automation, profile = %profile, "Starting run");

        let result = match automation {
            Automation::Full => Ok(self.full(profile).await),
            other => self.step(other, profile).await,
        };

        match &result {
            Ok(report) => info!(
                automation = %automation,
                processed = report.processed,
                created = report.created,
                updated = report.updated,
                skipped = report.skipped,
                failed = report.failed,
                duration_ms = report.duration_ms(),
                "Run finished"
            ),
            Err(e) => error!(automation = %automation, error = %e, "Run aborted"),
        }
        result
    }

    async fn step(&self, automation: Automation, profile: &SyncProfile) -> Result<RunReport> {
        match automation {
            Automation::Sync => self.sync(profile).await,
            Automation::Link => self.link(profile).await,
            Automation::Tasks => self.tasks(profile).await,
            Automation::Assign => self.assign(profile).await,
            Automation::Relations => self.relations(profile).await,
            Automation::Refresh => self.refresh(profile).await,
            Automation::Full => Err(SyncError::UnknownAutomation(
                "full cannot run as a step".to_string(),
            )),
        }
    }

    /// Every step in order; a failing step does not stop the next one.
    async fn full(&self, profile: &SyncProfile) -> RunReport {
        let mut report = RunReport::start(Automation::Full, self.now());
        report.profile = Some(profile.name.clone());

        for automation in Automation::FULL_SEQUENCE {
            let outcome = match self.step(automation, profile).await {
                Ok(step) => StepOutcome::succeeded(step),
                Err(e) => {
                    error!(step = %automation, error = %e, "Step failed");
                    StepOutcome::failed(automation, e)
                }
            };
            report.push_step(outcome);
        }

        report.finish(self.now())
    }

    /// Waits between two writes, as configured by the profile.
    pub(crate) async fn pause(&self, profile: &SyncProfile) {
        if !profile.pause.is_zero() {
            tokio::time::sleep(profile.pause).await;
        }
    }
}
