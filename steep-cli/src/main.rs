use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use steep_config::{ConfigLoader, SteepConfig};
use steep_logging::init_logging_from_config;
use tracing::{debug, info};

mod cli;
mod commands;
mod status;

use cli::{Cli, Commands};

/// Load configuration from file or use defaults
fn load_config(config_path: Option<&PathBuf>) -> Result<SteepConfig> {
    let loader = ConfigLoader::new();

    match config_path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Configuration file not found: {:?}", path);
            }
            info!("Loading configuration from: {:?}", path);
            loader
                .from_file(path)
                .context(format!("Failed to load configuration from {:?}", path))
        }
        None => {
            debug!("No configuration file specified. Loading from environment or defaults.");
            loader
                .from_env()
                .context("Failed to load configuration from environment")
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first
    let mut config = load_config(cli.config.as_ref())?;

    init_logging_from_config(&config.logging, cli.log_level.as_deref())?;
    debug!("steep starting");

    match &cli.command {
        Some(Commands::Swarm(args)) => commands::handle_swarm(args, &mut config).await,
        Some(Commands::Probe { flow, json }) => commands::handle_probe(*flow, *json, &config).await,
        Some(Commands::Report { report_cmd }) => commands::handle_report(report_cmd, &mut config),
        Some(Commands::Config { config_cmd }) => commands::handle_config(config_cmd, &config),
        None => {
            // If no subcommand is provided, print help
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            cmd.print_help().context("Failed to print help")?;
            println!();
            Ok(())
        }
    }
}
