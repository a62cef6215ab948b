//! FFprobe adapter for media duration probing

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::Deserialize;
use tracing::debug;

use crate::domain::errors::TimelineError;
use crate::error::{BreakcutError, BreakcutResult};
use crate::ports::ProbePort;

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    /// ffprobe prints numbers as strings
    duration: Option<String>,
}

/// FFprobe-based probe adapter
#[derive(Debug, Clone)]
pub struct FfprobeAdapter {
    ffprobe: PathBuf,
}

impl FfprobeAdapter {
    pub fn new(ffprobe: impl Into<PathBuf>) -> Self {
        Self {
            ffprobe: ffprobe.into(),
        }
    }

    /// Extract the container duration from `-of json` output
    pub fn parse_duration(json: &str) -> BreakcutResult<f64> {
        let output: ProbeOutput = serde_json::from_str(json).map_err(|e| BreakcutError::Probe {
            message: format!("Unreadable ffprobe output: {}", e),
        })?;

        let duration = output
            .format
            .and_then(|f| f.duration)
            .and_then(|d| d.trim().parse::<f64>().ok())
            .ok_or_else(|| BreakcutError::Probe {
                message: "ffprobe reported no container duration".to_string(),
            })?;

        if !duration.is_finite() || duration <= 0.0 {
            return Err(TimelineError::InvalidDuration { duration }.into());
        }
        Ok(duration)
    }
}

impl ProbePort for FfprobeAdapter {
    fn duration(&self, path: &Path) -> BreakcutResult<f64> {
        debug!("Probing duration of {}", path.display());

        let output = Command::new(&self.ffprobe)
            .args(["-v", "error", "-show_entries", "format=duration", "-of", "json"])
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| BreakcutError::Probe {
                message: format!("Failed to run {}: {}", self.ffprobe.display(), e),
            })?;

        if !output.status.success() {
            return Err(BreakcutError::Probe {
                message: format!(
                    "{} exited with {:?}: {}",
                    self.ffprobe.display(),
                    output.status.code(),
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        Self::parse_duration(&String::from_utf8_lossy(&output.stdout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_parse_duration() {
        let json = r#"{ "format": { "duration": "1800.040000" } }"#;
        assert_eq!(FfprobeAdapter::parse_duration(json).unwrap(), 1800.04);
    }

    #[test]
    fn test_parse_duration_missing() {
        let err = FfprobeAdapter::parse_duration(r#"{ "format": {} }"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Probe);
        assert!(FfprobeAdapter::parse_duration(r#"{}"#).is_err());
        assert!(FfprobeAdapter::parse_duration("not json").is_err());
        assert!(FfprobeAdapter::parse_duration(r#"{ "format": { "duration": "N/A" } }"#).is_err());
    }

    #[test]
    fn test_parse_duration_zero_is_invalid_duration() {
        let err = FfprobeAdapter::parse_duration(r#"{"format":{"duration":"0.000000"}}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDuration);

        let err = FfprobeAdapter::parse_duration(r#"{"format":{"duration":"-4.5"}}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDuration);
    }
}
