//! Command implementations

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio::sync::Semaphore;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::adapters::{FfprobeAdapter, LocalFsAdapter, StdProcessAdapter, TracingProgressAdapter};
use crate::cli::args::{
    BatchArgs, ChaptersArgs, ImportKeepArgs, RemoveArgs, SegmentsArgs, SupportedArgs,
};
use crate::config::RemovalConfig;
use crate::domain::model::{KeepSegment, Timeline};
use crate::engine::{CancellationToken, RemovalReport, RemovalRequest, RemovalService};
use crate::markers::{format_marker_text, import_keep_list, parse_marker_text, MarkerFormat, MarkerGateway};
use crate::output::chapters::write_chapter_files;
use crate::planner::StrategySelector;
use crate::ports::FsPort;
use crate::utils::path::extension_of;
use crate::utils::Utils;

/// Wire the production adapters into a removal service
pub fn build_service(config: &RemovalConfig, label: &str, cancel: CancellationToken) -> RemovalService {
    RemovalService::new(
        Arc::new(StdProcessAdapter::new()),
        Arc::new(LocalFsAdapter::new()),
        Arc::new(FfprobeAdapter::new(config.tools.ffprobe.clone())),
        Arc::new(TracingProgressAdapter::new(label)),
        config.clone(),
    )
    .with_cancellation(cancel)
}

fn timeline_for(config: &RemovalConfig, duration: f64) -> Timeline {
    Timeline::new(duration, config.offset_seconds, config.minimum_segment_seconds)
}

fn default_work_dir(source: &Path) -> PathBuf {
    match source.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn summarize(report: &RemovalReport) -> String {
    if !report.success {
        return format!(
            "{}: failed ({})",
            report.source.display(),
            report.message.as_deref().unwrap_or("unknown error")
        );
    }
    if report.nothing_to_remove {
        return format!("{}: no commercials found", report.source.display());
    }
    format!(
        "{}: kept {} segments ({:.1}s) with {}{} -> {}",
        report.source.display(),
        report.segments,
        report.kept_seconds,
        report.strategy.map(|s| s.name()).unwrap_or("-"),
        if report.fallback_used { " (fallback)" } else { "" },
        report
            .output
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    )
}

/// Execute the remove command
pub fn remove(args: RemoveArgs, config: &RemovalConfig, profile: &str) -> Result<()> {
    if !args.input.is_file() {
        bail!("Input file does not exist: {}", args.input.display());
    }

    let work_dir = args.workdir.clone().unwrap_or_else(|| default_work_dir(&args.input));
    std::fs::create_dir_all(&work_dir)
        .with_context(|| format!("Failed to create working directory {}", work_dir.display()))?;

    let mut request = RemovalRequest::new(&args.input, &work_dir).with_profile(profile);
    if let Some(markers) = &args.markers {
        request = request.with_markers(markers);
    }
    if let Some(duration) = args.duration {
        request = request.with_duration(duration);
    }

    let label = args
        .input
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let service = build_service(config, &label, CancellationToken::new());
    let report = service.remove(&request);

    if args.report {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        );
    } else {
        println!("{}", summarize(&report));
    }

    if !report.success {
        bail!(
            "Commercial removal failed: {}",
            report.message.unwrap_or_default()
        );
    }
    Ok(())
}

/// Recordings in `dir` that have a supported container and a marker file
pub fn collect_batch_sources(
    dir: &Path,
    recursive: bool,
    config: &RemovalConfig,
    profile: &str,
) -> Vec<PathBuf> {
    let selector = StrategySelector::new(config);
    let fs = LocalFsAdapter::new();
    let gateway = MarkerGateway::new(&fs, config);
    let marker_extensions = [
        MarkerFormat::Simplified.extension(),
        MarkerFormat::Precise.extension(),
    ];

    let mut sources: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(if recursive { usize::MAX } else { 1 })
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            let extension = extension_of(path);
            !marker_extensions.contains(&extension.as_str())
                && !path.to_string_lossy().contains(".merged.")
                && selector.is_supported(&extension, profile)
        })
        .filter(|path| {
            let candidates = gateway.locate(path, &default_work_dir(path));
            candidates.simplified.is_some() || candidates.precise.is_some()
        })
        .collect();

    sources.sort();
    sources
}

/// Execute the batch command
pub fn batch(args: BatchArgs, config: &RemovalConfig, profile: &str) -> Result<()> {
    if !args.dir.is_dir() {
        bail!("Batch directory does not exist: {}", args.dir.display());
    }

    let sources = collect_batch_sources(&args.dir, args.recursive, config, profile);
    if sources.is_empty() {
        println!("No recordings with marker files found in {}", args.dir.display());
        return Ok(());
    }

    if let Some(work_dir) = &args.workdir {
        std::fs::create_dir_all(work_dir)
            .with_context(|| format!("Failed to create working directory {}", work_dir.display()))?;
    }

    let jobs = args.jobs.unwrap_or_else(num_cpus::get).max(1);
    info!("Processing {} recordings with {} parallel jobs", sources.len(), jobs);

    let requests: Vec<RemovalRequest> = sources
        .iter()
        .map(|source| {
            let work_dir = args.workdir.clone().unwrap_or_else(|| default_work_dir(source));
            RemovalRequest::new(source, work_dir).with_profile(profile)
        })
        .collect();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let reports = runtime.block_on(run_batch(requests, config.clone(), jobs))?;

    let failed = reports.iter().filter(|r| !r.success).count();
    for report in &reports {
        println!("{}", summarize(report));
    }
    println!(
        "{} of {} recordings processed successfully",
        reports.len() - failed,
        reports.len()
    );

    if failed > 0 {
        bail!("{} recordings failed", failed);
    }
    Ok(())
}

/// Run independent removal jobs on blocking workers, at most `jobs` at a time.
///
/// Ctrl-C cancels every job before its next extraction or merge step.
pub async fn run_batch(
    requests: Vec<RemovalRequest>,
    config: RemovalConfig,
    jobs: usize,
) -> Result<Vec<RemovalReport>> {
    let cancel = CancellationToken::new();
    let semaphore = Arc::new(Semaphore::new(jobs));

    let interrupt = cancel.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current steps");
            interrupt.cancel();
        }
    });

    let mut handles = Vec::with_capacity(requests.len());
    for request in requests {
        let permit = Arc::clone(&semaphore)
            .acquire_owned()
            .await
            .context("Job limiter closed")?;
        let label = request
            .source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let service = build_service(&config, &label, cancel.clone());

        handles.push(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            service.remove(&request)
        }));
    }

    let mut reports = Vec::with_capacity(handles.len());
    for handle in handles {
        reports.push(handle.await.context("Removal worker panicked")?);
    }
    watcher.abort();

    Ok(reports)
}

fn read_segments(markers: &Path, timeline: &Timeline) -> Result<Vec<KeepSegment>> {
    let text = std::fs::read_to_string(markers)
        .with_context(|| format!("Failed to read marker file {}", markers.display()))?;
    let cuts = parse_marker_text(&text)
        .with_context(|| format!("Invalid marker file {}", markers.display()))?;
    Ok(timeline.keep_segments(&cuts)?)
}

/// Execute the segments command
pub fn segments(args: SegmentsArgs, config: &RemovalConfig) -> Result<()> {
    let timeline = timeline_for(config, args.duration);
    let segments = read_segments(&args.markers, &timeline)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&segments)?);
        return Ok(());
    }

    if segments.is_empty() {
        println!("No commercials found");
        return Ok(());
    }
    for segment in &segments {
        println!("{:.3}\t{:.3}", segment.start, segment.end);
    }
    let kept: f64 = segments.iter().map(KeepSegment::length).sum();
    info!(
        "{} keep-segments, {:.3}s kept of {:.3}s",
        segments.len(),
        kept,
        timeline.duration
    );
    Ok(())
}

/// Execute the chapters command
pub fn chapters(args: ChaptersArgs, config: &RemovalConfig) -> Result<()> {
    let timeline = timeline_for(config, args.duration);
    let segments = read_segments(&args.markers, &timeline)?;
    let chapters = timeline.chapters(&segments, args.already_cut)?;

    let stem = args
        .output_stem
        .clone()
        .unwrap_or_else(|| args.markers.with_extension(""));
    let written = write_chapter_files(&LocalFsAdapter::new(), &stem, &chapters, &config.chapters)?;

    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}

/// Execute the import-keep command
pub fn import_keep(args: ImportKeepArgs, config: &RemovalConfig) -> Result<()> {
    let timeline = timeline_for(config, args.duration);
    let text = std::fs::read_to_string(&args.keep_list)
        .with_context(|| format!("Failed to read keep-list {}", args.keep_list.display()))?;
    let cuts = import_keep_list(&text, &timeline)?;

    LocalFsAdapter::new().write_text(&args.output, &format_marker_text(&cuts))?;
    println!(
        "Wrote {} cut markers to {} ({})",
        cuts.len(),
        args.output.display(),
        Utils::format_file_size(std::fs::metadata(&args.output)?.len())
    );
    Ok(())
}

/// Execute the supported command
pub fn supported(args: SupportedArgs, config: &RemovalConfig, profile: &str) -> Result<()> {
    let selector = StrategySelector::new(config);
    match selector.select(&args.ext, profile) {
        Ok(strategy) => println!("supported ({})", strategy),
        Err(_) => println!("unsupported"),
    }
    Ok(())
}
