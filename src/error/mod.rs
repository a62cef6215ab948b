//! Error handling module for Breakcut

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::errors::TimelineError;

/// Main error type for Breakcut operations
#[derive(Error, Debug)]
pub enum BreakcutError {
    /// Timeline model failure (duration, marker parsing, chapters)
    #[error(transparent)]
    Timeline(#[from] TimelineError),

    /// One keep-segment could not be extracted
    #[error("Extraction of segment {segment} failed: {message}")]
    ExtractionFailed { segment: String, message: String },

    /// Merged output failed the size check
    #[error("Merge with {tool} failed validation: {actual} bytes written, {expected} bytes expected")]
    MergeValidationFailed {
        tool: String,
        expected: u64,
        actual: u64,
    },

    /// No removal strategy applies to the container
    #[error("Unsupported container: '{extension}'")]
    UnsupportedContainer { extension: String },

    /// Job stopped before its next step
    #[error("Removal cancelled")]
    Cancelled,

    /// Marker file could not be located or persisted
    #[error("Marker file error: {message}")]
    MarkerFile { message: String },

    /// Invalid configuration
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Media duration probe failed
    #[error("Failed to probe media file: {message}")]
    Probe { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Stable error classification carried in removal reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidDuration,
    ParseError,
    EmptyTimeline,
    ExtractionFailed,
    MergeValidationFailed,
    UnsupportedContainer,
    Cancelled,
    MarkerFile,
    Config,
    Probe,
    Io,
}

impl BreakcutError {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Timeline(TimelineError::InvalidDuration { .. }) => ErrorKind::InvalidDuration,
            Self::Timeline(TimelineError::ParseError { .. }) => ErrorKind::ParseError,
            Self::Timeline(TimelineError::EmptyTimeline) => ErrorKind::EmptyTimeline,
            Self::ExtractionFailed { .. } => ErrorKind::ExtractionFailed,
            Self::MergeValidationFailed { .. } => ErrorKind::MergeValidationFailed,
            Self::UnsupportedContainer { .. } => ErrorKind::UnsupportedContainer,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::MarkerFile { .. } => ErrorKind::MarkerFile,
            Self::Config { .. } => ErrorKind::Config,
            Self::Probe { .. } => ErrorKind::Probe,
            Self::Io(_) => ErrorKind::Io,
        }
    }

    /// Whether a whole-pipeline retry with another strategy may help
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ExtractionFailed { .. } | Self::MergeValidationFailed { .. } | Self::Io(_)
        )
    }

    pub fn marker_file(message: impl Into<String>) -> Self {
        Self::MarkerFile {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Result type alias for Breakcut operations
pub type BreakcutResult<T> = std::result::Result<T, BreakcutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_mapping() {
        let err: BreakcutError = TimelineError::InvalidDuration { duration: 0.0 }.into();
        assert_eq!(err.kind(), ErrorKind::InvalidDuration);
        assert!(!err.is_retryable());

        let err = BreakcutError::MergeValidationFailed {
            tool: "mp4box".to_string(),
            expected: 100,
            actual: 10,
        };
        assert_eq!(err.kind(), ErrorKind::MergeValidationFailed);
        assert!(err.is_retryable());

        let err = BreakcutError::UnsupportedContainer {
            extension: "xyz".to_string(),
        };
        assert!(!err.is_retryable());
        assert_eq!(err.to_string(), "Unsupported container: 'xyz'");
    }
}
