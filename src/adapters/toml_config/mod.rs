// Config file adapter - Loads removal configuration from TOML or YAML files

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::RemovalConfig;
use crate::error::{BreakcutError, BreakcutResult};

/// Name of the project-local configuration file
pub const LOCAL_CONFIG_FILE: &str = "breakcut.toml";

/// Candidate configuration files in lookup order
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];

    let config_home = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
        .or_else(|| std::env::var_os("APPDATA").map(PathBuf::from));
    if let Some(dir) = config_home {
        paths.push(dir.join("breakcut").join("config.toml"));
    }
    paths
}

/// Load a configuration file, choosing the format by extension
pub fn load_config_file(path: &Path) -> BreakcutResult<RemovalConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        BreakcutError::config(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let config = match extension.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&content).map_err(|e| {
            BreakcutError::config(format!("Failed to parse YAML config {}: {}", path.display(), e))
        })?,
        _ => toml::from_str(&content).map_err(|e| {
            BreakcutError::config(format!("Failed to parse TOML config {}: {}", path.display(), e))
        })?,
    };

    debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Load the first existing default configuration file, or the defaults
pub fn load_default_config() -> BreakcutResult<RemovalConfig> {
    for path in default_config_paths() {
        if path.is_file() {
            return load_config_file(&path);
        }
    }
    Ok(RemovalConfig::default())
}
