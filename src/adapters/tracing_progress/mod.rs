// Tracing progress adapter - Progress reporting through tracing events

use std::sync::atomic::{AtomicU32, Ordering};

use tracing::info;

use crate::ports::ProgressPort;

/// Logs progress and remembers the last reported percentage
#[derive(Debug, Default)]
pub struct TracingProgressAdapter {
    label: String,
    last_percent: AtomicU32,
}

impl TracingProgressAdapter {
    /// Create a progress reporter labelled with the job's source name
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            last_percent: AtomicU32::new(0f32.to_bits()),
        }
    }

    /// Last reported percentage
    pub fn last_percent(&self) -> f32 {
        f32::from_bits(self.last_percent.load(Ordering::Relaxed))
    }
}

impl ProgressPort for TracingProgressAdapter {
    fn report(&self, percent: f32, stage: &str) {
        let percent = percent.clamp(0.0, 100.0);
        self.last_percent.store(percent.to_bits(), Ordering::Relaxed);
        info!(job = %self.label, "[{:>3.0}%] {}", percent, stage);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_percent_is_clamped() {
        let progress = TracingProgressAdapter::new("show.ts");
        assert_eq!(progress.last_percent(), 0.0);
        progress.report(140.0, "merging");
        assert_eq!(progress.last_percent(), 100.0);
        progress.report(0.0, "failed");
        assert_eq!(progress.last_percent(), 0.0);
    }
}
