//! Background schedule checker.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tokio::time::interval;
use tracing::{debug, error, info};

use callboard_core::SyncProfile;

use crate::automation::Automation;
use crate::pipeline::Pipelines;
use crate::report::StepOutcome;
use crate::schedule::Schedule;

/// Source of local wall-clock time.
pub type LocalClock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// Called after every scheduled run.
pub type RunObserver = Arc<dyn Fn(&StepOutcome) + Send + Sync>;

fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Runs every automation due at `now`, in schedule order.
pub async fn run_due(
    pipelines: &Pipelines,
    schedule: &RwLock<Schedule>,
    profile: &SyncProfile,
    now: NaiveDateTime,
) -> Vec<StepOutcome> {
    let due = schedule.read().await.due(now);
    let mut outcomes = Vec::with_capacity(due.len());
    for automation in due {
        outcomes.push(run_one(pipelines, automation, profile).await);
    }
    outcomes
}

async fn run_one(pipelines: &Pipelines, automation: Automation, profile: &SyncProfile) -> StepOutcome {
    match pipelines.run(automation, profile).await {
        Ok(report) => StepOutcome::succeeded(report),
        Err(e) => StepOutcome::failed(automation, e),
    }
}

/// Checks the schedule on an interval until shutdown.
///
/// An automation runs at most once per scheduled hour, however short the
/// check interval.
pub struct Scheduler {
    pipelines: Pipelines,
    schedule: Arc<RwLock<Schedule>>,
    profile: SyncProfile,
    check_interval: Duration,
    shutdown: watch::Receiver<bool>,
    clock: LocalClock,
    observer: Option<RunObserver>,
    last_runs: HashMap<Automation, (NaiveDate, u32)>,
}

impl Scheduler {
    pub fn new(
        pipelines: Pipelines,
        schedule: Arc<RwLock<Schedule>>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        let config = pipelines.config();
        let profile = config.profile.clone();
        let check_interval = config.server.scheduler_interval;
        Self {
            pipelines,
            schedule,
            profile,
            check_interval,
            shutdown,
            clock: Arc::new(local_now),
            observer: None,
            last_runs: HashMap::new(),
        }
    }

    pub fn with_profile(mut self, profile: SyncProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_interval(mut self, check_interval: Duration) -> Self {
        self.check_interval = check_interval;
        self
    }

    pub fn with_clock(mut self, clock: LocalClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_observer(mut self, observer: RunObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Run the check loop until the shutdown signal.
    pub async fn run(&mut self) {
        let mut ticker = interval(self.check_interval);
        info!(
            interval_secs = self.check_interval.as_secs(),
            profile = %self.profile,
            "Scheduler started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick().await;
                }
                _ = self.shutdown.changed() => {
                    if *self.shutdown.borrow() {
                        debug!("Scheduler received shutdown signal");
                        break;
                    }
                }
            }
        }

        info!("Scheduler stopped");
    }

    /// One check: runs what is due and has not run this hour yet.
    pub async fn tick(&mut self) -> Vec<StepOutcome> {
        let now = (self.clock)();
        let slot = (now.date(), now.hour());
        let due: Vec<Automation> = self
            .schedule
            .read()
            .await
            .due(now)
            .into_iter()
            .filter(|a| self.last_runs.get(a) != Some(&slot))
            .collect();

        let mut outcomes = Vec::with_capacity(due.len());
        for automation in due {
            self.last_runs.insert(automation, slot);
            let outcome = run_one(&self.pipelines, automation, &self.profile).await;
            if !outcome.success {
                error!(automation = %automation, error = ?outcome.error, "Scheduled run failed");
            }
            if let Some(observer) = &self.observer {
                observer(&outcome);
            }
            outcomes.push(outcome);
        }
        outcomes
    }
}
