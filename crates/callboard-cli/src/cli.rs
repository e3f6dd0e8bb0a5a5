//! Command-line interface definition using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use callboard_core::SyncProfile;
use callboard_sync::{Automation, DEFAULT_BOARD_NAME};

/// Callboard - Aircall calls and their AI insights on Monday.com boards
#[derive(Parser, Debug)]
#[command(name = "callboard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Env file to read settings from (default: .env.local, then .env)
    #[arg(short, long, env = "CALLBOARD_ENV_FILE", global = true)]
    pub env_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one automation now (sync, link, tasks, assign, relations, refresh, full)
    Run {
        /// Automation to run
        automation: Automation,

        /// Sync profile (full, optimized, ultra, batch)
        #[arg(short, long)]
        profile: Option<SyncProfile>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Run every automation scheduled for the current local hour
    ScheduleCheck {
        /// Sync profile (full, optimized, ultra, batch)
        #[arg(short, long)]
        profile: Option<SyncProfile>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show the default schedule and what is due now
    Schedule,

    /// List sync profiles
    Profiles,

    /// Check credentials and board access
    Check,

    /// Create a call board with every synced column
    SetupBoard {
        /// Board name
        #[arg(short, long, default_value = DEFAULT_BOARD_NAME)]
        name: String,
    },

    /// Start the HTTP API
    Serve {
        /// Host to bind to (default: CALLBOARD_HOST or 127.0.0.1)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (default: CALLBOARD_PORT or 8080)
        #[arg(short, long)]
        port: Option<u16>,

        /// Also run the background scheduler
        #[arg(short, long)]
        scheduler: bool,
    },
}

/// Output format for run results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Cli {
    /// Returns the log level based on verbosity.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}
