//! Breakcut Commercial Removal Library
//!
//! Converts commercial cut-marker files into keep-segment timelines and removes
//! the cut intervals from recordings with external stream-copy tools, validating
//! every merge and falling back to alternate tools and strategies on failure.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod config_initialization;
pub mod domain;
pub mod engine;
pub mod error;
pub mod markers;
pub mod output;
pub mod planner;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use config::RemovalConfig;
pub use domain::errors::TimelineError;
pub use domain::model::{ChapterList, ChapterMarker, CutMarker, KeepSegment, Timeline};
pub use domain::rules::TimelineRules;
pub use engine::{RemovalPipeline, RemovalReport, RemovalRequest, RemovalService};
pub use error::{BreakcutError, BreakcutResult, ErrorKind};
pub use planner::{StrategyKind, StrategySelector};
