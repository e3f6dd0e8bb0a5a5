//! Synchronisation pipelines for Callboard.
//!
//! Every automation is a stateless batch run over a [`CallSource`] and a
//! [`BoardStore`]:
//! - `sync`: import recent Aircall calls with their AI artifacts
//! - `link`: write the matching seller or buyer into each call item
//! - `tasks`: turn AI action items into tasks on the to-do board
//! - `assign`: set task owners from the responsible agent
//! - `relations`: point each call item's relation column at its contact
//! - `full`: the five above, in order
//! - `refresh`: rewrite existing call items once their AI artifacts exist
//!
//! [`Pipelines::setup_board`] provisions a fresh call board.
//!
//! [`Schedule`] and [`Scheduler`] run them at configured local hours.
//!
//! [`CallSource`]: callboard_aircall::CallSource
//! [`BoardStore`]: callboard_monday::BoardStore

pub mod assign;
pub mod automation;
pub mod contacts;
pub mod error;
pub mod link;
pub mod pipeline;
pub mod refresh;
pub mod relations;
pub mod report;
pub mod schedule;
pub mod scheduler;
pub mod setup;
pub mod sync;
pub mod tasks;

#[cfg(test)]
mod testing;

pub use automation::Automation;
pub use error::{Result, SyncError};
pub use pipeline::{Clock, Pipelines};
pub use report::{RunReport, StepOutcome};
pub use schedule::{EntryStatus, Schedule, ScheduleEntry, SchedulePatch};
pub use scheduler::{run_due, LocalClock, RunObserver, Scheduler};
pub use setup::{BoardSetup, DEFAULT_BOARD_NAME};
