//! Commercial removal engine

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{BreakcutError, BreakcutResult};

pub mod commands;
pub mod job;
pub mod pipeline;
pub mod service;

pub use job::{JobState, RemovalJob};
pub use pipeline::{PipelineOutcome, RemovalPipeline};
pub use service::{RemovalReport, RemovalRequest, RemovalService};

/// Smallest accepted merged size as a fraction of the expected size
pub const MERGE_SIZE_RATIO: f64 = 0.7;

/// Whether a merge result is acceptable
pub fn merge_is_valid(tool_succeeded: bool, expected: u64, actual: u64) -> bool {
    tool_succeeded && expected > 0 && actual as f64 >= MERGE_SIZE_RATIO * expected as f64
}

/// Shared stop flag, observed between extraction and merge steps
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Fail with `Cancelled` once the token has been cancelled
    pub fn check(&self) -> BreakcutResult<()> {
        if self.is_cancelled() {
            Err(BreakcutError::Cancelled)
        } else {
            Ok(())
        }
    }
}
