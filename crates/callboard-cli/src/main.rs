//! Callboard CLI entry point.

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use callboard_cli::cli::Cli;
use callboard_cli::commands;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level().to_string()));

    fmt().with_env_filter(filter).with_target(false).init();

    let result = match commands::load_config(cli.env_file.as_deref()) {
        Ok(config) => commands::execute(cli.command, config).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
