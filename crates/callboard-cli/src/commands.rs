//! Command handlers for CLI subcommands.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::{watch, RwLock};
use tracing::{info, warn};

use callboard_aircall::{AircallClient, CallSource};
use callboard_api::{serve_with_shutdown, ApiConfig, AppState};
use callboard_core::{Config, SyncProfile};
use callboard_monday::{BoardStore, MondayClient};
use callboard_sync::{run_due, Pipelines, RunReport, Schedule, Scheduler, StepOutcome};

use crate::cli::{Commands, OutputFormat};

/// Result type for command operations.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Loads the process configuration.
///
/// An explicit env file is read as is; otherwise `.env.local` or `.env` is
/// merged into the process environment first.
pub fn load_config(env_file: Option<&Path>) -> Result<Config> {
    match env_file {
        Some(path) => Ok(Config::from_env_file(path)?),
        None => {
            let _ = dotenvy::from_filename(".env.local").or_else(|_| dotenvy::dotenv());
            Ok(Config::from_env()?)
        }
    }
}

/// Execute a CLI command.
pub async fn execute(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Run {
            automation,
            profile,
            format,
        } => {
            let profile = profile.unwrap_or_else(|| config.profile.clone());
            let pipelines = build_pipelines(config)?;
            let report = pipelines.run(automation, &profile).await?;
            print_report(&report, format)
        }
        Commands::ScheduleCheck { profile, format } => {
            let profile = profile.unwrap_or_else(|| config.profile.clone());
            cmd_schedule_check(build_pipelines(config)?, &profile, format).await
        }
        Commands::Schedule => cmd_schedule(),
        Commands::Profiles => cmd_profiles(&config.profile),
        Commands::Check => cmd_check(&config).await,
        Commands::SetupBoard { name } => {
            let profile = config.profile.clone();
            let setup = build_pipelines(config)?.setup_board(&name, &profile).await?;
            println!("Board created: {} ({})", name, setup.board_id);
            println!(
                "{} columns, {} groups, {} failures",
                setup.columns.len(),
                setup.groups.len(),
                setup.failed
            );
            println!("\nAdd to your .env:");
            for line in setup.env_lines() {
                println!("{}", line);
            }
            Ok(())
        }
        Commands::Serve {
            host,
            port,
            scheduler,
        } => cmd_serve(config, host, port, scheduler).await,
    }
}

fn build_pipelines(config: Config) -> Result<Pipelines> {
    config.validate()?;
    let source = AircallClient::new(&config.aircall)?;
    let store = MondayClient::new(&config.monday)?;
    Ok(Pipelines::new(
        Arc::new(source),
        Arc::new(store),
        Arc::new(config),
    ))
}

fn print_report(report: &RunReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Table => {
            println!("{}", report.summary());
            for step in &report.steps {
                println!("  {}", step_line(step));
            }
        }
    }
    Ok(())
}

fn step_line(step: &StepOutcome) -> String {
    match (&step.report, &step.error) {
        (Some(report), _) if step.success => format!("✅ {}: {}", step.automation, report.summary()),
        (_, error) => format!(
            "❌ {}: {}",
            step.automation,
            error.as_deref().unwrap_or("unknown error")
        ),
    }
}

async fn cmd_schedule_check(
    pipelines: Pipelines,
    profile: &SyncProfile,
    format: OutputFormat,
) -> Result<()> {
    let now = chrono::Local::now().naive_local();
    let schedule = RwLock::new(Schedule::new());
    let outcomes = run_due(&pipelines, &schedule, profile, now).await;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcomes)?),
        OutputFormat::Table => {
            if outcomes.is_empty() {
                println!("Nothing scheduled at {}", now.format("%A %H:%M"));
            }
            for outcome in &outcomes {
                println!("{}", step_line(outcome));
            }
        }
    }
    Ok(())
}

fn cmd_schedule() -> Result<()> {
    let now = chrono::Local::now().naive_local();
    println!(
        "{:<10} {:<8} {:<8} {:<28} {:<5} NEXT",
        "NAME", "ENABLED", "FREQ", "HOURS", "DUE"
    );
    for status in Schedule::new().status(now) {
        let hours: Vec<String> = status.entry.hours.iter().map(u32::to_string).collect();
        println!(
            "{:<10} {:<8} {:<8} {:<28} {:<5} {}",
            status.automation,
            status.entry.enabled,
            status.entry.frequency,
            hours.join(","),
            if status.should_run { "yes" } else { "no" },
            status.next_run
        );
    }
    Ok(())
}

fn cmd_profiles(current: &SyncProfile) -> Result<()> {
    println!(
        "{:<10} {:>6} {:>6} {:>8} {:>6} {:>6}",
        "NAME", "FETCH", "ITEMS", "TIMEOUT", "HOURS", "PAUSE"
    );
    for name in SyncProfile::PRESETS {
        let profile: SyncProfile = name.parse()?;
        let marker = if profile.name == current.name { " *" } else { "" };
        println!(
            "{:<10} {:>6} {:>6} {:>7}s {:>6} {:>5}s{}",
            profile.name,
            profile.fetch_limit,
            profile.max_items,
            profile.per_call_timeout.as_secs(),
            profile.hours_back.as_secs() / 3600,
            profile.pause.as_secs(),
            marker
        );
    }
    Ok(())
}

async fn cmd_check(config: &Config) -> Result<()> {
    config.validate()?;
    let timeout = config.profile.per_call_timeout;

    let aircall = AircallClient::new(&config.aircall)?;
    aircall.ping(timeout).await?;
    println!("✅ Aircall: credentials accepted");

    let monday = MondayClient::new(&config.monday)?.with_timeout(timeout);
    let boards = [
        ("calls", &config.boards.calls),
        ("tasks", &config.boards.tasks),
        ("sellers", &config.boards.sellers),
        ("buyers", &config.boards.buyers),
    ];
    let mut failures = 0;
    for (label, board_id) in boards {
        match monday.board_columns(board_id).await {
            Ok(columns) => println!(
                "✅ Monday {} board {}: {} columns",
                label,
                board_id,
                columns.len()
            ),
            Err(e) => {
                warn!(board_id = %board_id, error = %e, "Board check failed");
                println!("❌ Monday {} board {}: {}", label, board_id, e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(format!("{} board(s) unreachable", failures).into());
    }
    Ok(())
}

async fn cmd_serve(
    config: Config,
    host: Option<String>,
    port: Option<u16>,
    with_scheduler: bool,
) -> Result<()> {
    let mut api_config = ApiConfig::from_server(&config.server);
    if let Some(host) = host {
        api_config.host = host;
    }
    if let Some(port) = port {
        api_config.port = port;
    }

    let pipelines = build_pipelines(config)?;
    let schedule = Arc::new(RwLock::new(Schedule::new()));
    let state = AppState::new(api_config.clone(), pipelines.clone()).with_schedule(schedule.clone());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler = with_scheduler.then(|| {
        let mut scheduler =
            Scheduler::new(pipelines, schedule, shutdown_rx).with_observer(state.observer());
        tokio::spawn(async move { scheduler.run().await })
    });

    println!("Callboard API on http://{}", api_config.bind_address());
    if scheduler.is_some() {
        println!("Scheduler enabled");
    }
    println!("Press Ctrl+C to stop");

    let shutdown = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            return;
        }
        info!("Shutdown requested");
        let _ = shutdown_tx.send(true);
    };
    serve_with_shutdown(api_config, state, shutdown).await?;

    if let Some(handle) = scheduler {
        let _ = handle.await;
    }
    Ok(())
}
