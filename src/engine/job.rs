//! Per-attempt removal job and its state machine

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::model::{KeepSegment, Timeline};
use crate::planner::StrategyKind;
use crate::ports::FsPort;
use crate::utils::path::{merged_file_path, working_copy_path};

/// Removal attempt state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Pending,
    Extracting,
    Merging,
    Validating,
    RetryMerge,
    Done,
    Failed,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Allowed transitions; single-pass strategies go straight from pending to merging
    pub fn can_transition_to(&self, next: JobState) -> bool {
        use JobState::*;
        match (self, next) {
            (_, Failed) => !self.is_terminal(),
            (Pending, Extracting | Merging | Done) => true,
            (Extracting, Merging) => true,
            (Merging, Validating) => true,
            (Validating, Done | RetryMerge) => true,
            (RetryMerge, Merging) => true,
            _ => false,
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "PENDING",
            Self::Extracting => "EXTRACTING",
            Self::Merging => "MERGING",
            Self::Validating => "VALIDATING",
            Self::RetryMerge => "RETRY_MERGE",
            Self::Done => "DONE",
            Self::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

/// One removal attempt for one source file.
///
/// The job owns every file it creates in the working directory and deletes them
/// in `cleanup`, which also runs on drop if the pipeline never got to it.
pub struct RemovalJob {
    source: PathBuf,
    work_dir: PathBuf,
    timeline: Timeline,
    segments: Vec<KeepSegment>,
    strategy: StrategyKind,
    fs: Arc<dyn FsPort>,
    sidecar_extensions: Vec<String>,
    state: JobState,
    transitions: Vec<JobState>,
    intermediates: Vec<PathBuf>,
    artifacts: Vec<PathBuf>,
    cleaned: bool,
}

impl RemovalJob {
    pub fn new(
        source: impl Into<PathBuf>,
        work_dir: impl Into<PathBuf>,
        timeline: Timeline,
        segments: Vec<KeepSegment>,
        strategy: StrategyKind,
        fs: Arc<dyn FsPort>,
    ) -> Self {
        Self {
            source: source.into(),
            work_dir: work_dir.into(),
            timeline,
            segments,
            strategy,
            fs,
            sidecar_extensions: Vec::new(),
            state: JobState::Pending,
            transitions: vec![JobState::Pending],
            intermediates: Vec::new(),
            artifacts: Vec::new(),
            cleaned: false,
        }
    }

    /// Extensions of sidecar files extraction tools leave next to intermediates
    pub fn with_sidecar_extensions(mut self, extensions: Vec<String>) -> Self {
        self.sidecar_extensions = extensions;
        self
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn segments(&self) -> &[KeepSegment] {
        &self.segments
    }

    pub fn strategy(&self) -> StrategyKind {
        self.strategy
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    /// Every state the job has been in, in order
    pub fn transitions(&self) -> &[JobState] {
        &self.transitions
    }

    pub fn intermediates(&self) -> &[PathBuf] {
        &self.intermediates
    }

    /// Merged output before it replaces the working copy
    pub fn merged_path(&self) -> PathBuf {
        merged_file_path(&self.work_dir, &self.source)
    }

    /// Working copy the merged output replaces
    pub fn working_copy(&self) -> PathBuf {
        working_copy_path(&self.work_dir, &self.source)
    }

    /// Total seconds retained
    pub fn kept_seconds(&self) -> f64 {
        self.segments.iter().map(KeepSegment::length).sum()
    }

    pub fn advance(&mut self, next: JobState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid transition {} -> {}",
            self.state,
            next
        );
        debug!(from = %self.state, to = %next, "Job state change");
        self.state = next;
        self.transitions.push(next);
    }

    /// Mark the attempt failed unless it already reached a terminal state
    pub fn fail(&mut self) {
        if !self.state.is_terminal() {
            self.advance(JobState::Failed);
        }
    }

    /// Record an intermediate segment file before the tool that writes it runs
    pub fn track_intermediate(&mut self, path: PathBuf) {
        self.intermediates.push(path);
    }

    /// Record a helper file (such as a concat list) for cleanup
    pub fn track_artifact(&mut self, path: PathBuf) {
        if !self.artifacts.contains(&path) {
            self.artifacts.push(path);
        }
    }

    fn sidecars_of(&self, path: &Path) -> Vec<PathBuf> {
        let mut sidecars = Vec::new();
        for extension in &self.sidecar_extensions {
            sidecars.push(path.with_extension(extension));
            let mut appended = path.as_os_str().to_os_string();
            appended.push(".");
            appended.push(extension);
            sidecars.push(PathBuf::from(appended));
        }
        sidecars
    }

    /// Delete every file this job created except the working copy; returns the number removed
    pub fn cleanup(&mut self) -> usize {
        let working_copy = self.working_copy();
        let mut doomed: Vec<PathBuf> = Vec::new();
        for intermediate in &self.intermediates {
            doomed.push(intermediate.clone());
            doomed.extend(self.sidecars_of(intermediate));
        }
        doomed.extend(self.artifacts.iter().cloned());
        doomed.push(self.merged_path());

        let removed = doomed
            .iter()
            .filter(|path| **path != working_copy && **path != self.source)
            .filter(|path| self.fs.safe_delete(path))
            .count();

        self.cleaned = true;
        debug!(removed, state = %self.state, "Cleaned up job files");
        removed
    }
}

impl Drop for RemovalJob {
    fn drop(&mut self) {
        if !self.cleaned {
            self.cleanup();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::LocalFsAdapter;
    use std::fs;

    fn job_in(dir: &Path) -> RemovalJob {
        RemovalJob::new(
            dir.join("show.ts"),
            dir,
            Timeline::new(100.0, 0.0, 5.0),
            vec![KeepSegment::new(3.0, 40.0), KeepSegment::new(45.0, 97.0)],
            StrategyKind::MpegTs,
            Arc::new(LocalFsAdapter::new()),
        )
        .with_sidecar_extensions(vec!["idx".to_string()])
    }

    #[test]
    fn test_transitions() {
        use JobState::*;
        assert!(Pending.can_transition_to(Extracting));
        assert!(Pending.can_transition_to(Merging));
        assert!(Validating.can_transition_to(RetryMerge));
        assert!(RetryMerge.can_transition_to(Merging));
        assert!(!Validating.can_transition_to(Extracting));
        assert!(!Done.can_transition_to(Failed));
        assert!(!Failed.can_transition_to(Done));
    }

    #[test]
    fn test_cleanup_removes_intermediates_and_sidecars() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("show.ts"), b"original").unwrap();
        let mut job = job_in(dir.path());

        let segment = dir.path().join("show-3-40.ts");
        fs::write(&segment, b"segment").unwrap();
        fs::write(dir.path().join("show-3-40.idx"), b"index").unwrap();
        fs::write(dir.path().join("show.ts.concat.txt"), b"list").unwrap();
        job.track_intermediate(segment.clone());
        job.track_artifact(dir.path().join("show.ts.concat.txt"));

        job.fail();
        assert_eq!(job.cleanup(), 3);
        assert!(!segment.exists());
        assert!(!dir.path().join("show-3-40.idx").exists());
        assert!(dir.path().join("show.ts").exists());
        assert_eq!(job.transitions(), &[JobState::Pending, JobState::Failed]);
    }

    #[test]
    fn test_drop_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let segment = dir.path().join("show-45-97.ts");
        {
            let mut job = job_in(dir.path());
            fs::write(&segment, b"segment").unwrap();
            job.track_intermediate(segment.clone());
        }
        assert!(!segment.exists());
    }

    #[test]
    fn test_kept_seconds() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(job_in(dir.path()).kept_seconds(), 89.0);
    }
}
