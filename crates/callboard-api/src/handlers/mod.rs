//! API request handlers.

pub mod automation;
pub mod health;
pub mod monitor;
pub mod schedule;

pub use automation::*;
pub use health::*;
pub use monitor::*;
pub use schedule::*;
