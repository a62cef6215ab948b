//! Extract, merge, validate and replace

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::commands::*;
use super::job::{JobState, RemovalJob};
use super::{merge_is_valid, CancellationToken};
use crate::config::ToolPaths;
use crate::error::{BreakcutError, BreakcutResult};
use crate::planner::{ExtractTool, MergeTool, RemovalPlan};
use crate::ports::{FsPort, ProcessPort, ProgressPort, ToolOutcome};
use crate::utils::path::{concat_list_path, extension_of, is_inside_dir, unique_segment_file_path};
use crate::utils::Utils;

/// Share of overall progress spent extracting segments
const EXTRACT_PROGRESS: f32 = 80.0;

/// Result of one successful pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineOutcome {
    /// Replaced working copy, `None` when there was nothing to remove
    pub output: Option<PathBuf>,
    pub merge_tool: Option<MergeTool>,
    /// Whether the alternate merge tool produced the output
    pub merge_retried: bool,
    pub expected_size: u64,
    pub actual_size: u64,
}

impl PipelineOutcome {
    fn nothing_to_remove() -> Self {
        Self {
            output: None,
            merge_tool: None,
            merge_retried: false,
            expected_size: 0,
            actual_size: 0,
        }
    }
}

/// Runs one removal job through its state machine
pub struct RemovalPipeline {
    process: Arc<dyn ProcessPort>,
    fs: Arc<dyn FsPort>,
    progress: Arc<dyn ProgressPort>,
    tools: ToolPaths,
    cancel: CancellationToken,
}

impl RemovalPipeline {
    pub fn new(
        process: Arc<dyn ProcessPort>,
        fs: Arc<dyn FsPort>,
        progress: Arc<dyn ProgressPort>,
        tools: ToolPaths,
    ) -> Self {
        Self {
            process,
            fs,
            progress,
            tools,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Run the job to a terminal state. Cleanup happens on every path.
    pub fn run(&self, job: &mut RemovalJob) -> BreakcutResult<PipelineOutcome> {
        if job.segments().is_empty() {
            info!("Nothing to remove from {}", job.source().display());
            job.advance(JobState::Done);
            job.cleanup();
            self.progress.report(100.0, "nothing to remove");
            return Ok(PipelineOutcome::nothing_to_remove());
        }

        info!(
            strategy = %job.strategy(),
            segments = job.segments().len(),
            "Removing commercials from {}",
            job.source().display()
        );

        let result = self.drive(job);
        if let Err(e) = &result {
            warn!(state = %job.state(), "Removal attempt failed: {}", e);
            job.fail();
            self.progress.report(0.0, "failed");
        }
        job.cleanup();
        result
    }

    fn drive(&self, job: &mut RemovalJob) -> BreakcutResult<PipelineOutcome> {
        let extension = extension_of(job.source());
        match job.strategy().plan(&extension) {
            RemovalPlan::SplitMerge {
                extract,
                merge,
                alternate,
            } => {
                let inputs = self.extract_all(job, extract)?;
                let mut expected = 0u64;
                for input in &inputs {
                    expected += self.fs.file_size(input)?;
                }
                self.merge_with_retry(job, &inputs, expected, merge, alternate)
            }
            RemovalPlan::SinglePass { tool } => {
                self.cancel.check()?;
                let source_size = self.fs.file_size(job.source())?;
                let duration = job.timeline().duration;
                let expected = if duration > 0.0 {
                    (source_size as f64 * job.kept_seconds() / duration).round() as u64
                } else {
                    0
                };
                job.advance(JobState::Merging);
                self.merge_with_retry(job, &[], expected, tool, None)
            }
        }
    }

    fn extract_all(&self, job: &mut RemovalJob, tool: ExtractTool) -> BreakcutResult<Vec<PathBuf>> {
        job.advance(JobState::Extracting);
        let segments = job.segments().to_vec();
        let total = segments.len();

        for (position, segment) in segments.iter().enumerate() {
            self.cancel.check()?;

            let output =
                unique_segment_file_path(job.work_dir(), job.source(), segment, job.intermediates());
            job.track_intermediate(output.clone());

            let (executable, args) = match tool {
                ExtractTool::FfmpegMpegTs => (
                    &self.tools.ffmpeg,
                    ffmpeg_extract_args(job.source(), segment, &output, true),
                ),
                ExtractTool::FfmpegCopy => (
                    &self.tools.ffmpeg,
                    ffmpeg_extract_args(job.source(), segment, &output, false),
                ),
                ExtractTool::Mp4BoxSplit => (
                    &self.tools.mp4box,
                    mp4box_extract_args(job.source(), segment, &output),
                ),
            };

            info!(segment = %segment, "Extracting segment {}/{}", position + 1, total);
            let outcome = self.process.run(executable, &args);
            if !outcome.success {
                return Err(BreakcutError::ExtractionFailed {
                    segment: segment.to_string(),
                    message: describe_failure(executable, &outcome),
                });
            }
            if !self.fs.file_exists(&output) {
                return Err(BreakcutError::ExtractionFailed {
                    segment: segment.to_string(),
                    message: format!("{} produced no output file", executable.display()),
                });
            }

            let done = Utils::calculate_progress(position + 1, total) / 100.0;
            self.progress.report(done * EXTRACT_PROGRESS, "extracting");
        }

        job.advance(JobState::Merging);
        Ok(job.intermediates().to_vec())
    }

    fn merge_with_retry(
        &self,
        job: &mut RemovalJob,
        inputs: &[PathBuf],
        expected: u64,
        primary: MergeTool,
        alternate: Option<MergeTool>,
    ) -> BreakcutResult<PipelineOutcome> {
        let mut tool = primary;
        let mut retried = false;

        loop {
            self.cancel.check()?;
            let merged = job.merged_path();
            self.fs.safe_delete(&merged);

            self.progress.report(EXTRACT_PROGRESS + 5.0, "merging");
            let outcome = self.merge(job, tool, inputs)?;
            let succeeded = merge_tool_succeeded(tool, &outcome);
            if !succeeded {
                warn!(tool = %tool, "{}", describe_failure(Path::new(tool.name()), &outcome));
            }

            job.advance(JobState::Validating);
            let actual = if self.fs.file_exists(&merged) {
                self.fs.file_size(&merged)?
            } else {
                0
            };

            if merge_is_valid(succeeded, expected, actual) {
                let target = job.working_copy();
                self.fs.replace(&merged, &target)?;
                job.advance(JobState::Done);
                self.progress.report(100.0, "done");
                if is_inside_dir(job.source(), job.work_dir()) {
                    info!(
                        tool = %tool,
                        expected = %Utils::format_file_size(expected),
                        actual = %Utils::format_file_size(actual),
                        "Replaced {} in place",
                        target.display()
                    );
                } else {
                    info!(
                        tool = %tool,
                        actual = %Utils::format_file_size(actual),
                        "Wrote {}; original left at {}",
                        target.display(),
                        job.source().display()
                    );
                }
                return Ok(PipelineOutcome {
                    output: Some(target),
                    merge_tool: Some(tool),
                    merge_retried: retried,
                    expected_size: expected,
                    actual_size: actual,
                });
            }

            warn!(tool = %tool, expected, actual, "Merged output failed validation");
            let failure = BreakcutError::MergeValidationFailed {
                tool: tool.name().to_string(),
                expected,
                actual,
            };
            match alternate {
                Some(next) if !retried => {
                    job.advance(JobState::RetryMerge);
                    info!(from = %tool, to = %next, "Retrying merge with alternate tool");
                    retried = true;
                    tool = next;
                    job.advance(JobState::Merging);
                }
                _ => return Err(failure),
            }
        }
    }

    fn merge(
        &self,
        job: &mut RemovalJob,
        tool: MergeTool,
        inputs: &[PathBuf],
    ) -> BreakcutResult<ToolOutcome> {
        let output = job.merged_path();
        let refs: Vec<&Path> = inputs.iter().map(PathBuf::as_path).collect();

        let (executable, args) = match tool {
            MergeTool::FfmpegConcatProtocol => {
                (&self.tools.ffmpeg, ffmpeg_concat_protocol_args(&refs, &output))
            }
            MergeTool::FfmpegConcatDemuxer => {
                let list = concat_list_path(job.work_dir(), job.source());
                job.track_artifact(list.clone());
                self.fs.write_text(&list, &concat_list_text(&refs))?;
                (&self.tools.ffmpeg, ffmpeg_concat_demuxer_args(&list, &output))
            }
            MergeTool::Mp4BoxCat => (&self.tools.mp4box, mp4box_cat_args(&refs, &output)),
            MergeTool::MkvmergeAppend => {
                (&self.tools.mkvmerge, mkvmerge_append_args(&refs, &output))
            }
            MergeTool::MkvmergeSplit => (
                &self.tools.mkvmerge,
                mkvmerge_split_args(job.source(), job.segments(), &output),
            ),
        };

        info!(tool = %tool, "Merging {} segments", job.segments().len());
        Ok(self.process.run(executable, &args))
    }
}

/// mkvmerge exits with 1 when it only emitted warnings
fn merge_tool_succeeded(tool: MergeTool, outcome: &ToolOutcome) -> bool {
    match tool {
        MergeTool::MkvmergeAppend | MergeTool::MkvmergeSplit => {
            outcome.success || outcome.exit_code == Some(1)
        }
        _ => outcome.success,
    }
}

fn describe_failure(executable: &Path, outcome: &ToolOutcome) -> String {
    let status = match outcome.exit_code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code".to_string(),
    };
    if outcome.diagnostics.is_empty() {
        format!("{} failed ({})", executable.display(), status)
    } else {
        format!("{} failed ({}): {}", executable.display(), status, outcome.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mkvmerge_warnings_count_as_success() {
        let warned = ToolOutcome::failed(Some(1), "Warning: track 2 has no frames");
        assert!(merge_tool_succeeded(MergeTool::MkvmergeSplit, &warned));
        assert!(!merge_tool_succeeded(MergeTool::Mp4BoxCat, &warned));
        assert!(!merge_tool_succeeded(
            MergeTool::MkvmergeAppend,
            &ToolOutcome::failed(Some(2), "Error")
        ));
    }

    #[test]
    fn test_describe_failure() {
        let text = describe_failure(Path::new("ffmpeg"), &ToolOutcome::failed(None, ""));
        assert_eq!(text, "ffmpeg failed (no exit code)");
    }
}
