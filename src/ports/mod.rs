// Ports - Interface definitions (contracts)
//
// Every call is blocking: a removal job runs its steps sequentially on the
// caller's worker thread.

use std::path::Path;

use crate::error::BreakcutResult;

/// Result of one external tool invocation
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutcome {
    pub success: bool,
    /// Exit code, `None` when the process could not be started or was killed
    pub exit_code: Option<i32>,
    /// Last lines of diagnostic output, for logging only
    pub diagnostics: String,
}

impl ToolOutcome {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            exit_code: Some(0),
            diagnostics: String::new(),
        }
    }

    pub fn failed(exit_code: Option<i32>, diagnostics: impl Into<String>) -> Self {
        Self {
            success: false,
            exit_code,
            diagnostics: diagnostics.into(),
        }
    }
}

/// Port for running external tools
pub trait ProcessPort: Send + Sync {
    /// Run `tool` with `args` to completion
    fn run(&self, tool: &Path, args: &[String]) -> ToolOutcome;
}

/// Port for file system operations
pub trait FsPort: Send + Sync {
    /// Check if file exists
    fn file_exists(&self, path: &Path) -> bool;

    /// Get file size in bytes
    fn file_size(&self, path: &Path) -> BreakcutResult<u64>;

    /// Read a small text file
    fn read_text(&self, path: &Path) -> BreakcutResult<String>;

    /// Write a small text file
    fn write_text(&self, path: &Path, contents: &str) -> BreakcutResult<()>;

    /// Move `from` over `to`, replacing any existing file
    fn replace(&self, from: &Path, to: &Path) -> BreakcutResult<()>;

    /// Delete a file, ignoring errors; returns whether a file was removed
    fn safe_delete(&self, path: &Path) -> bool;
}

/// Port for media duration probing
pub trait ProbePort: Send + Sync {
    /// Total duration of the media file in seconds
    fn duration(&self, path: &Path) -> BreakcutResult<f64>;
}

/// Port for job progress reporting
pub trait ProgressPort: Send + Sync {
    /// Report overall progress in percent (0-100) with a short stage description
    fn report(&self, percent: f32, stage: &str);
}
