// Domain errors - Error types for the timeline layer

use thiserror::Error;

/// Errors raised by timeline operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimelineError {
    /// Source duration unknown or not positive
    #[error("Invalid source duration: {duration}s (must be greater than zero)")]
    InvalidDuration { duration: f64 },

    /// Malformed marker line
    #[error("Malformed marker on line {line}: '{content}'")]
    ParseError { line: usize, content: String },

    /// No chapters could be derived
    #[error("Timeline is empty: no chapters can be derived")]
    EmptyTimeline,
}

impl TimelineError {
    /// Create a parse error for a 1-based line number
    pub fn parse(line: usize, content: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            content: content.into(),
        }
    }
}
