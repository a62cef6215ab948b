//! Breakcut CLI
//!
//! Removes commercials from recorded video using cut-marker files, by
//! extracting the keep-segments with stream copy and merging them back.
//!
//! # Usage
//!
//! ```bash
//! breakcut remove --input "Show.ts"
//! breakcut batch --dir /recordings --jobs 2
//! breakcut segments --markers Show.edl --duration 1800
//! breakcut chapters --markers Show.edl --duration 1800 --already-cut
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use breakcut_cli::cli::{commands, Cli, Commands};
use breakcut_cli::config_initialization::initialize_configuration_hierarchy;
use breakcut_cli::utils::logging::{init_logging, with_bootstrap_logging, LoggingConfig};

/// Main entry point for the Breakcut CLI application
fn main() -> Result<()> {
    let cli = Cli::parse();

    let overrides = cli.overrides();
    let bootstrap = LoggingConfig {
        level: overrides.log_level.unwrap_or_default(),
        json: overrides.json_logs,
    };
    let config = with_bootstrap_logging(&bootstrap, || {
        initialize_configuration_hierarchy(cli.config.as_deref(), &overrides)
    })
    .context("Failed to load configuration")?;
    init_logging(&config.logging);
    debug!(?config, "Configuration loaded");

    let profile = cli.profile.clone();
    match cli.command {
        Commands::Remove(args) => {
            info!("Executing remove command");
            commands::remove(args, &config, &profile)?;
        }
        Commands::Batch(args) => {
            info!("Executing batch command");
            commands::batch(args, &config, &profile)?;
        }
        Commands::Segments(args) => commands::segments(args, &config)?,
        Commands::Chapters(args) => commands::chapters(args, &config)?,
        Commands::ImportKeep(args) => commands::import_keep(args, &config)?,
        Commands::Supported(args) => commands::supported(args, &config, &profile)?,
    }

    Ok(())
}
