//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;
use clap_num::number_range;

/// Parallel job limit accepted by `batch --jobs`
fn job_count(value: &str) -> Result<usize, String> {
    number_range(value, 1, 64)
}

/// Arguments for the remove command
#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Recording to remove commercials from
    #[arg(short, long)]
    pub input: PathBuf,

    /// Marker file to use instead of `<stem>.edl` / `<stem>.edlp`
    #[arg(short, long)]
    pub markers: Option<PathBuf>,

    /// Working directory (default: the recording's directory, replacing it in place)
    #[arg(short, long)]
    pub workdir: Option<PathBuf>,

    /// Source duration in seconds (default: probed with ffprobe)
    #[arg(long)]
    pub duration: Option<f64>,

    /// Seconds already trimmed from the front of the recording
    #[arg(long)]
    pub offset: Option<f64>,

    /// Shortest keep-segment worth extracting, in seconds
    #[arg(long)]
    pub min_segment: Option<f64>,

    /// Print the removal report as JSON
    #[arg(long)]
    pub report: bool,
}

/// Arguments for the batch command
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Directory containing recordings and their marker files
    #[arg(short, long)]
    pub dir: PathBuf,

    /// Working directory for every job (default: each recording's directory)
    #[arg(short, long)]
    pub workdir: Option<PathBuf>,

    /// Concurrent jobs (default: number of CPUs)
    #[arg(short, long, value_parser = job_count)]
    pub jobs: Option<usize>,

    /// Descend into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Seconds already trimmed from the front of each recording
    #[arg(long)]
    pub offset: Option<f64>,

    /// Shortest keep-segment worth extracting, in seconds
    #[arg(long)]
    pub min_segment: Option<f64>,
}

/// Arguments for the segments command
#[derive(Args, Debug)]
pub struct SegmentsArgs {
    /// Marker file to read
    #[arg(short, long)]
    pub markers: PathBuf,

    /// Source duration in seconds
    #[arg(short, long)]
    pub duration: f64,

    #[arg(long)]
    pub offset: Option<f64>,

    #[arg(long)]
    pub min_segment: Option<f64>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the chapters command
#[derive(Args, Debug)]
pub struct ChaptersArgs {
    /// Marker file to read
    #[arg(short, long)]
    pub markers: PathBuf,

    /// Source duration in seconds
    #[arg(short, long)]
    pub duration: f64,

    /// Chapters for a file that already had the commercials removed
    #[arg(long)]
    pub already_cut: bool,

    /// Path prefix for the chapter files (default: the marker file without extension)
    #[arg(short, long)]
    pub output_stem: Option<PathBuf>,

    #[arg(long)]
    pub offset: Option<f64>,

    #[arg(long)]
    pub min_segment: Option<f64>,
}

/// Arguments for the import-keep command
#[derive(Args, Debug)]
pub struct ImportKeepArgs {
    /// File with one `start end` range to keep per line
    #[arg(short, long)]
    pub keep_list: PathBuf,

    /// Source duration in seconds
    #[arg(short, long)]
    pub duration: f64,

    /// Marker file to write
    #[arg(short, long)]
    pub output: PathBuf,

    #[arg(long)]
    pub offset: Option<f64>,

    #[arg(long)]
    pub min_segment: Option<f64>,
}

/// Arguments for the supported command
#[derive(Args, Debug)]
pub struct SupportedArgs {
    /// Container extension, with or without the dot
    #[arg(short, long)]
    pub ext: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_count_range() {
        assert_eq!(job_count("4"), Ok(4));
        assert!(job_count("0").is_err());
        assert!(job_count("65").is_err());
        assert!(job_count("many").is_err());
    }
}
