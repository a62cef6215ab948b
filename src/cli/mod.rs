//! CLI module for Breakcut
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_PROFILE;
use crate::config_initialization::CliOverrides;
use crate::utils::logging::LogLevel;

pub mod args;
pub mod commands;

fn log_level(value: &str) -> Result<LogLevel, String> {
    LogLevel::parse(value).ok_or_else(|| format!("unknown log level '{}'", value))
}

/// Breakcut - Commercial removal for recorded video
///
/// Turns commercial cut lists into keep-segments and removes the cut
/// intervals from recordings by stream copy, without re-encoding.
#[derive(Parser, Debug)]
#[command(name = "breakcut")]
#[command(about = "Breakcut - Remove commercials from recordings using cut-marker files")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (TOML or YAML)
    #[arg(long, global = true, env = "BREAKCUT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Logging level
    #[arg(long, global = true, value_parser = log_level)]
    pub log_level: Option<LogLevel>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Configuration profile for strategy overrides
    #[arg(long, global = true, default_value = DEFAULT_PROFILE)]
    pub profile: String,

    /// Prefer the per-frame precise marker file
    #[arg(long, global = true, conflicts_with = "force_simple")]
    pub force_precise: bool,

    /// Prefer the simplified marker file
    #[arg(long, global = true)]
    pub force_simple: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Remove commercials from one recording
    Remove(args::RemoveArgs),
    /// Remove commercials from every recording in a directory
    Batch(args::BatchArgs),
    /// Print the keep-segments described by a marker file
    Segments(args::SegmentsArgs),
    /// Write chapter files derived from a marker file
    Chapters(args::ChaptersArgs),
    /// Convert a keep-list into a marker file
    ImportKeep(args::ImportKeepArgs),
    /// Check whether a container extension can be processed
    Supported(args::SupportedArgs),
}

impl Cli {
    /// Command-line values that override the configuration file and environment
    pub fn overrides(&self) -> CliOverrides {
        let (minimum_segment_seconds, offset_seconds) = match &self.command {
            Commands::Remove(a) => (a.min_segment, a.offset),
            Commands::Batch(a) => (a.min_segment, a.offset),
            Commands::Segments(a) => (a.min_segment, a.offset),
            Commands::Chapters(a) => (a.min_segment, a.offset),
            Commands::ImportKeep(a) => (a.min_segment, a.offset),
            Commands::Supported(_) => (None, None),
        };

        CliOverrides {
            minimum_segment_seconds,
            offset_seconds,
            log_level: self.log_level,
            json_logs: self.json_logs,
            force_precise: self.force_precise,
            force_simple: self.force_simple,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_overrides_from_subcommand() {
        let cli = Cli::parse_from([
            "breakcut",
            "--log-level",
            "debug",
            "segments",
            "--markers",
            "show.edl",
            "--duration",
            "100",
            "--min-segment",
            "0",
        ]);
        let overrides = cli.overrides();
        assert_eq!(overrides.minimum_segment_seconds, Some(0.0));
        assert_eq!(overrides.offset_seconds, None);
        assert_eq!(overrides.log_level, Some(LogLevel::Debug));
    }
}
