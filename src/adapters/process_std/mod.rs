// Process adapter - Runs external tools with std::process

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::ports::{ProcessPort, ToolOutcome};

/// Lines of stderr kept for diagnostics
const DIAGNOSTIC_LINES: usize = 8;

/// Blocking process runner
#[derive(Debug, Clone, Default)]
pub struct StdProcessAdapter;

impl StdProcessAdapter {
    pub fn new() -> Self {
        Self
    }

    fn tail(text: &str) -> String {
        let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
        let start = lines.len().saturating_sub(DIAGNOSTIC_LINES);
        lines[start..].join("\n")
    }
}

impl ProcessPort for StdProcessAdapter {
    fn run(&self, tool: &Path, args: &[String]) -> ToolOutcome {
        debug!(tool = %tool.display(), args = ?args, "Running external tool");

        let output = Command::new(tool)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output();

        match output {
            Ok(output) => {
                let diagnostics = Self::tail(&String::from_utf8_lossy(&output.stderr));
                if output.status.success() {
                    ToolOutcome {
                        success: true,
                        exit_code: output.status.code(),
                        diagnostics,
                    }
                } else {
                    warn!(
                        tool = %tool.display(),
                        code = ?output.status.code(),
                        "External tool reported failure"
                    );
                    ToolOutcome::failed(output.status.code(), diagnostics)
                }
            }
            Err(e) => {
                warn!(tool = %tool.display(), "Failed to start external tool: {}", e);
                ToolOutcome::failed(None, e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tool_reports_failure() {
        let outcome = StdProcessAdapter::new().run(
            Path::new("breakcut-definitely-missing-tool"),
            &["--version".to_string()],
        );
        assert!(!outcome.success);
        assert_eq!(outcome.exit_code, None);
    }

    #[test]
    fn test_tail_keeps_last_lines() {
        let text = (1..=20).map(|i| format!("line {}", i)).collect::<Vec<_>>().join("\n");
        let tail = StdProcessAdapter::tail(&text);
        assert!(tail.starts_with("line 13"));
        assert!(tail.ends_with("line 20"));
    }
}
