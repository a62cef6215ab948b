//! Removal configuration passed explicitly into the selector and pipeline

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{BreakcutError, BreakcutResult};
use crate::utils::logging::LoggingConfig;

/// Name of the profile used when none is requested
pub const DEFAULT_PROFILE: &str = "default";

/// Complete removal configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemovalConfig {
    /// Shortest keep-segment worth extracting, in seconds (0 disables)
    pub minimum_segment_seconds: f64,
    /// Seconds already trimmed from the front of the source file
    pub offset_seconds: f64,
    /// Retry the whole job with the universal strategy after a strategy fails
    pub strategy_fallback: bool,
    /// Extensions of sidecar files removed next to each intermediate (`<segment>.<ext>`)
    pub sidecar_extensions: Vec<String>,
    pub markers: MarkerConfig,
    pub chapters: ChapterConfig,
    pub tools: ToolPaths,
    /// Per-profile strategy overrides
    pub profiles: HashMap<String, ProfileOverrides>,
    pub logging: LoggingConfig,
}

/// Marker-file format forcing flags
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    /// Prefer the per-frame precise `.edlp` candidate when present
    pub force_precise: bool,
    /// Prefer the simplified `.edl` candidate
    pub force_simple: bool,
}

/// Which chapter derivatives to write beside the canonical marker file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChapterConfig {
    pub ogm: bool,
    pub ttxt: bool,
    pub ffmetadata: bool,
}

impl Default for ChapterConfig {
    fn default() -> Self {
        Self {
            ogm: true,
            ttxt: true,
            ffmetadata: false,
        }
    }
}

/// External tool executables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolPaths {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
    pub mp4box: PathBuf,
    pub mkvmerge: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
            mp4box: PathBuf::from("MP4Box"),
            mkvmerge: PathBuf::from("mkvmerge"),
        }
    }
}

/// Strategy overrides for one configuration profile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileOverrides {
    /// Allow the universal remover for containers without a native strategy
    pub universal_remover: bool,
    /// Use the universal remover for every container
    pub force_universal: bool,
}

impl Default for RemovalConfig {
    fn default() -> Self {
        Self {
            minimum_segment_seconds: 5.0,
            offset_seconds: 0.0,
            strategy_fallback: true,
            sidecar_extensions: vec!["idx".to_string()],
            markers: MarkerConfig::default(),
            chapters: ChapterConfig::default(),
            tools: ToolPaths::default(),
            profiles: HashMap::new(),
            logging: LoggingConfig::default(),
        }
    }
}

impl RemovalConfig {
    /// Overrides for a profile; unknown profiles get the defaults
    pub fn profile(&self, name: &str) -> ProfileOverrides {
        self.profiles.get(name).cloned().unwrap_or_default()
    }

    /// Validate configuration values
    pub fn validate(&mut self) -> BreakcutResult<()> {
        if !self.minimum_segment_seconds.is_finite() || self.minimum_segment_seconds < 0.0 {
            return Err(BreakcutError::config(format!(
                "minimum_segment_seconds must be a non-negative number, got {}",
                self.minimum_segment_seconds
            )));
        }
        if !self.offset_seconds.is_finite() || self.offset_seconds < 0.0 {
            return Err(BreakcutError::config(format!(
                "offset_seconds must be a non-negative number, got {}",
                self.offset_seconds
            )));
        }
        if self.markers.force_precise && self.markers.force_simple {
            tracing::warn!("Both marker formats forced; precise format takes precedence");
            self.markers.force_simple = false;
        }
        for (name, tool) in [
            ("ffmpeg", &self.tools.ffmpeg),
            ("ffprobe", &self.tools.ffprobe),
            ("mp4box", &self.tools.mp4box),
            ("mkvmerge", &self.tools.mkvmerge),
        ] {
            if tool.as_os_str().is_empty() {
                return Err(BreakcutError::config(format!("Tool path for {} is empty", name)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RemovalConfig::default();
        assert_eq!(config.minimum_segment_seconds, 5.0);
        assert!(config.strategy_fallback);
        assert!(config.chapters.ogm);
        assert!(!config.chapters.ffmetadata);
        assert_eq!(config.tools.mkvmerge, PathBuf::from("mkvmerge"));
    }

    #[test]
    fn test_validate_rejects_negative_threshold() {
        let mut config = RemovalConfig {
            minimum_segment_seconds: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_resolves_conflicting_marker_flags() {
        let mut config = RemovalConfig::default();
        config.markers.force_precise = true;
        config.markers.force_simple = true;
        config.validate().unwrap();
        assert!(config.markers.force_precise);
        assert!(!config.markers.force_simple);
    }

    #[test]
    fn test_unknown_profile_uses_defaults() {
        let mut config = RemovalConfig::default();
        config.profiles.insert(
            "archive".to_string(),
            ProfileOverrides {
                universal_remover: true,
                force_universal: false,
            },
        );
        assert!(config.profile("archive").universal_remover);
        assert!(!config.profile("missing").universal_remover);
    }
}
