//! Removal strategy planning

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod strategy;

pub use strategy::StrategySelector;

/// Container-specific removal strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// MPEG transport and program streams
    MpegTs,
    /// ISO base media files
    Mp4,
    /// Matroska and WebM
    Matroska,
    /// Generic stream-copy extraction and concatenation for any container
    Universal,
}

impl StrategyKind {
    /// Native strategy for a normalized extension
    pub fn for_extension(extension: &str) -> Option<Self> {
        match extension {
            "ts" | "m2ts" | "mts" | "tp" | "trp" | "mpg" | "mpeg" | "vob" => Some(Self::MpegTs),
            "mp4" | "m4v" | "mov" => Some(Self::Mp4),
            "mkv" | "mka" | "webm" => Some(Self::Matroska),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::MpegTs => "mpegts",
            Self::Mp4 => "mp4",
            Self::Matroska => "matroska",
            Self::Universal => "universal",
        }
    }

    /// Whether the simplified marker file wins when neither format is forced
    pub fn prefers_simplified_markers(&self) -> bool {
        matches!(self, Self::MpegTs)
    }

    /// Strategy for the one-shot whole-job retry after this one fails
    pub fn outer_fallback(&self) -> Option<Self> {
        match self {
            Self::Universal => None,
            _ => Some(Self::Universal),
        }
    }

    /// Extraction and merge plan for this strategy on a file with `extension`
    pub fn plan(&self, extension: &str) -> RemovalPlan {
        match self {
            Self::MpegTs => RemovalPlan::SplitMerge {
                extract: ExtractTool::FfmpegMpegTs,
                merge: MergeTool::FfmpegConcatProtocol,
                alternate: Some(MergeTool::FfmpegConcatDemuxer),
            },
            Self::Mp4 => RemovalPlan::SplitMerge {
                extract: ExtractTool::Mp4BoxSplit,
                merge: MergeTool::Mp4BoxCat,
                alternate: Some(MergeTool::FfmpegConcatDemuxer),
            },
            Self::Matroska => RemovalPlan::SinglePass {
                tool: MergeTool::MkvmergeSplit,
            },
            Self::Universal => RemovalPlan::SplitMerge {
                extract: ExtractTool::FfmpegCopy,
                merge: MergeTool::FfmpegConcatDemuxer,
                alternate: matches!(Self::for_extension(extension), Some(Self::Matroska))
                    .then_some(MergeTool::MkvmergeAppend),
            },
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tool that cuts one keep-segment into an intermediate file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractTool {
    /// ffmpeg input seek, stream copy, MPEG-TS muxer
    FfmpegMpegTs,
    /// ffmpeg input seek, stream copy, container from the file extension
    FfmpegCopy,
    /// MP4Box `-splitx`
    Mp4BoxSplit,
}

/// Tool that produces the final merged file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeTool {
    /// ffmpeg `concat:` protocol (byte-level, MPEG-TS only)
    FfmpegConcatProtocol,
    /// ffmpeg concat demuxer driven by a list file
    FfmpegConcatDemuxer,
    /// MP4Box `-cat`
    Mp4BoxCat,
    /// mkvmerge `+` append
    MkvmergeAppend,
    /// mkvmerge `--split parts:` in one pass from the source
    MkvmergeSplit,
}

impl MergeTool {
    pub fn name(&self) -> &'static str {
        match self {
            Self::FfmpegConcatProtocol => "ffmpeg-concat-protocol",
            Self::FfmpegConcatDemuxer => "ffmpeg-concat-demuxer",
            Self::Mp4BoxCat => "mp4box-cat",
            Self::MkvmergeAppend => "mkvmerge-append",
            Self::MkvmergeSplit => "mkvmerge-split",
        }
    }
}

impl fmt::Display for MergeTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a strategy turns keep-segments into the output file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalPlan {
    /// Extract every segment, then merge the intermediates
    SplitMerge {
        extract: ExtractTool,
        merge: MergeTool,
        /// Tool used for the single merge retry
        alternate: Option<MergeTool>,
    },
    /// One tool call extracts and merges directly from the source
    SinglePass { tool: MergeTool },
}
