//! Job boundary: strategy selection, marker resolution, outer fallback and reporting

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, info_span, warn};

use super::job::{JobState, RemovalJob};
use super::pipeline::RemovalPipeline;
use super::CancellationToken;
use crate::config::{RemovalConfig, DEFAULT_PROFILE};
use crate::domain::errors::TimelineError;
use crate::domain::model::{KeepSegment, Timeline};
use crate::error::{BreakcutError, BreakcutResult, ErrorKind};
use crate::markers::{GatewayOutcome, MarkerGateway};
use crate::output::chapters::write_chapter_files;
use crate::planner::{MergeTool, StrategyKind, StrategySelector};
use crate::ports::{FsPort, ProbePort, ProcessPort, ProgressPort};
use crate::utils::path::extension_of;

/// One commercial removal request
#[derive(Debug, Clone, PartialEq)]
pub struct RemovalRequest {
    pub source: PathBuf,
    pub work_dir: PathBuf,
    /// Marker file to use instead of searching for candidates
    pub markers: Option<PathBuf>,
    /// Known source duration; probed when absent
    pub duration: Option<f64>,
    pub profile: String,
}

impl RemovalRequest {
    pub fn new(source: impl Into<PathBuf>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            work_dir: work_dir.into(),
            markers: None,
            duration: None,
            profile: DEFAULT_PROFILE.to_string(),
        }
    }

    pub fn with_markers(mut self, markers: impl Into<PathBuf>) -> Self {
        self.markers = Some(markers.into());
        self
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }
}

/// Structured outcome of a removal request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemovalReport {
    pub source: PathBuf,
    pub success: bool,
    /// No marker file or no commercials; the source was left alone
    pub nothing_to_remove: bool,
    /// Strategy that produced the output, or the last one tried
    pub strategy: Option<StrategyKind>,
    /// Whether the whole job was retried with the universal strategy
    pub fallback_used: bool,
    pub merge_tool: Option<MergeTool>,
    pub merge_retried: bool,
    pub segments: usize,
    pub kept_seconds: f64,
    pub canonical_markers: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub error_kind: Option<ErrorKind>,
    pub message: Option<String>,
    /// State history across every attempt
    pub transitions: Vec<JobState>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RemovalReport {
    fn started(source: PathBuf) -> Self {
        let now = Utc::now();
        Self {
            source,
            success: false,
            nothing_to_remove: false,
            strategy: None,
            fallback_used: false,
            merge_tool: None,
            merge_retried: false,
            segments: 0,
            kept_seconds: 0.0,
            canonical_markers: None,
            output: None,
            error_kind: None,
            message: None,
            transitions: Vec::new(),
            started_at: now,
            finished_at: now,
        }
    }
}

/// Removes commercials from one file at a time; failures never escape `remove`
pub struct RemovalService {
    process: Arc<dyn ProcessPort>,
    fs: Arc<dyn FsPort>,
    probe: Arc<dyn ProbePort>,
    progress: Arc<dyn ProgressPort>,
    config: RemovalConfig,
    cancel: CancellationToken,
}

impl RemovalService {
    pub fn new(
        process: Arc<dyn ProcessPort>,
        fs: Arc<dyn FsPort>,
        probe: Arc<dyn ProbePort>,
        progress: Arc<dyn ProgressPort>,
        config: RemovalConfig,
    ) -> Self {
        Self {
            process,
            fs,
            probe,
            progress,
            config,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &RemovalConfig {
        &self.config
    }

    /// Run a removal request to completion and describe what happened
    pub fn remove(&self, request: &RemovalRequest) -> RemovalReport {
        let span = info_span!("removal", source = %request.source.display());
        let _entered = span.enter();

        let mut report = RemovalReport::started(request.source.clone());
        match self.try_remove(request, &mut report) {
            Ok(()) => report.success = true,
            Err(e) => {
                error!(kind = ?e.kind(), "Commercial removal failed: {}", e);
                self.progress.report(0.0, "failed");
                report.error_kind = Some(e.kind());
                report.message = Some(e.to_string());
            }
        }
        report.finished_at = Utc::now();
        report
    }

    fn try_remove(&self, request: &RemovalRequest, report: &mut RemovalReport) -> BreakcutResult<()> {
        let selector = StrategySelector::new(&self.config);
        let mut strategy = selector.select(&extension_of(&request.source), &request.profile)?;
        report.strategy = Some(strategy);

        if !self.fs.file_exists(&request.source) {
            return Err(BreakcutError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Source file not found: {}", request.source.display()),
            )));
        }

        let duration = match request.duration {
            Some(duration) => duration,
            None => self.probe.duration(&request.source)?,
        };
        let timeline = Timeline::new(
            duration,
            self.config.offset_seconds,
            self.config.minimum_segment_seconds,
        );
        if !timeline.is_usable() {
            return Err(TimelineError::InvalidDuration { duration }.into());
        }

        let gateway = MarkerGateway::new(self.fs.as_ref(), &self.config);
        let (canonical, segments) = match gateway.establish(
            &request.source,
            &request.work_dir,
            strategy,
            &timeline,
            request.markers.as_deref(),
        )? {
            GatewayOutcome::NoCommercials => {
                report.nothing_to_remove = true;
                self.progress.report(100.0, "no commercials found");
                return Ok(());
            }
            GatewayOutcome::Segments {
                canonical,
                segments,
            } => (canonical, segments),
        };
        report.canonical_markers = Some(canonical.clone());
        report.segments = segments.len();
        report.kept_seconds = segments.iter().map(KeepSegment::length).sum();

        let pipeline = RemovalPipeline::new(
            Arc::clone(&self.process),
            Arc::clone(&self.fs),
            Arc::clone(&self.progress),
            self.config.tools.clone(),
        )
        .with_cancellation(self.cancel.clone());

        loop {
            let mut job = RemovalJob::new(
                &request.source,
                &request.work_dir,
                timeline,
                segments.clone(),
                strategy,
                Arc::clone(&self.fs),
            )
            .with_sidecar_extensions(self.config.sidecar_extensions.clone());

            let result = pipeline.run(&mut job);
            report.transitions.extend_from_slice(job.transitions());
            report.strategy = Some(strategy);

            match result {
                Ok(outcome) => {
                    report.merge_tool = outcome.merge_tool;
                    report.merge_retried = outcome.merge_retried;
                    report.output = outcome.output;

                    // The working copy is already replaced; chapter export cannot fail the job
                    if let Err(e) = self.write_compensated_chapters(&canonical, &timeline, &segments) {
                        warn!("Could not write chapters for the cut file: {}", e);
                    }
                    info!(strategy = %strategy, "Commercial removal complete");
                    return Ok(());
                }
                Err(e) => {
                    let fallback = if e.is_retryable() && !report.fallback_used {
                        selector.outer_fallback(strategy)
                    } else {
                        None
                    };
                    match fallback {
                        Some(next) => {
                            warn!(from = %strategy, to = %next, "Retrying whole job after: {}", e);
                            strategy = next;
                            report.fallback_used = true;
                        }
                        None => return Err(e),
                    }
                }
            }
        }
    }

    fn write_compensated_chapters(
        &self,
        canonical: &Path,
        timeline: &Timeline,
        segments: &[KeepSegment],
    ) -> BreakcutResult<Vec<PathBuf>> {
        let chapters = timeline.chapters(segments, true)?;
        write_chapter_files(
            self.fs.as_ref(),
            &canonical.with_extension(""),
            &chapters,
            &self.config.chapters,
        )
    }
}
