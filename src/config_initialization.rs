//! Configuration initialization and hierarchy management

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::adapters::toml_config::{load_config_file, load_default_config};
use crate::config::RemovalConfig;
use crate::error::{BreakcutError, BreakcutResult};
use crate::utils::logging::LogLevel;

/// Values given on the command line; `None` leaves lower layers in charge
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub minimum_segment_seconds: Option<f64>,
    pub offset_seconds: Option<f64>,
    pub log_level: Option<LogLevel>,
    pub json_logs: bool,
    pub force_precise: bool,
    pub force_simple: bool,
}

/// Build the configuration following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration_hierarchy(
    config_file: Option<&Path>,
    cli: &CliOverrides,
) -> BreakcutResult<RemovalConfig> {
    let mut config = match config_file {
        Some(path) => load_config_file(path)?,
        None => load_default_config()?,
    };

    let env_overrides = apply_environment(&mut config, |name| std::env::var(name).ok())?;
    if env_overrides > 0 {
        info!("Applied {} environment variable overrides", env_overrides);
    }

    let cli_overrides = apply_cli_overrides(&mut config, cli);
    if cli_overrides > 0 {
        debug!("Applied {} CLI configuration overrides", cli_overrides);
    }

    config.validate()?;
    Ok(config)
}

/// Apply `BREAKCUT_*` variables; returns how many were applied
pub fn apply_environment<F>(config: &mut RemovalConfig, lookup: F) -> BreakcutResult<usize>
where
    F: Fn(&str) -> Option<String>,
{
    let mut applied = 0;

    if let Some(value) = lookup("BREAKCUT_MIN_SEGMENT") {
        config.minimum_segment_seconds = parse_env_number("BREAKCUT_MIN_SEGMENT", &value)?;
        applied += 1;
    }
    if let Some(value) = lookup("BREAKCUT_OFFSET") {
        config.offset_seconds = parse_env_number("BREAKCUT_OFFSET", &value)?;
        applied += 1;
    }

    let tools: [(&str, &mut PathBuf); 4] = [
        ("BREAKCUT_FFMPEG", &mut config.tools.ffmpeg),
        ("BREAKCUT_FFPROBE", &mut config.tools.ffprobe),
        ("BREAKCUT_MP4BOX", &mut config.tools.mp4box),
        ("BREAKCUT_MKVMERGE", &mut config.tools.mkvmerge),
    ];
    for (name, slot) in tools {
        if let Some(value) = lookup(name) {
            *slot = PathBuf::from(value);
            applied += 1;
        }
    }

    if let Some(value) = lookup("BREAKCUT_LOG_LEVEL") {
        config.logging.level = LogLevel::parse(&value).ok_or_else(|| {
            BreakcutError::config(format!("BREAKCUT_LOG_LEVEL: unknown level '{}'", value))
        })?;
        applied += 1;
    }
    if let Some(value) = lookup("BREAKCUT_FORCE_PRECISE") {
        config.markers.force_precise = parse_env_flag("BREAKCUT_FORCE_PRECISE", &value)?;
        applied += 1;
    }
    if let Some(value) = lookup("BREAKCUT_FORCE_SIMPLE") {
        config.markers.force_simple = parse_env_flag("BREAKCUT_FORCE_SIMPLE", &value)?;
        applied += 1;
    }

    Ok(applied)
}

/// Apply command-line values; returns how many were applied
pub fn apply_cli_overrides(config: &mut RemovalConfig, cli: &CliOverrides) -> usize {
    let mut applied = 0;
    if let Some(min) = cli.minimum_segment_seconds {
        config.minimum_segment_seconds = min;
        applied += 1;
    }
    if let Some(offset) = cli.offset_seconds {
        config.offset_seconds = offset;
        applied += 1;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
        applied += 1;
    }
    if cli.json_logs {
        config.logging.json = true;
        applied += 1;
    }
    if cli.force_precise {
        config.markers.force_precise = true;
        config.markers.force_simple = false;
        applied += 1;
    }
    if cli.force_simple {
        config.markers.force_simple = true;
        config.markers.force_precise = false;
        applied += 1;
    }
    applied
}

fn parse_env_number(name: &str, value: &str) -> BreakcutResult<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| BreakcutError::config(format!("{}: '{}' is not a number", name, value)))
}

fn parse_env_flag(name: &str, value: &str) -> BreakcutResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(BreakcutError::config(format!("{}: '{}' is not a boolean", name, value))),
    }
}
