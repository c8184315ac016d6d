//! Stock screener CLI application.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use screener_config::load_config;
use screener_monitor::setup_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;

    // Setup logging
    let _guard = setup_logging(
        cli.log_filter(&config),
        cli.json_logs(&config),
        config.logging.file.as_deref(),
    );

    // Execute command
    match cli.command {
        Commands::Screen(args) => cli::commands::screen::run(args, config).await,
        Commands::Regions => cli::commands::regions::run(&config).await,
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config, &config).await,
    }
}
