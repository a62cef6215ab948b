// Domain models - Timeline value types

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::errors::TimelineError;
use crate::domain::rules::TimelineRules;

/// Half-open time interval in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: f64,
    pub end: f64,
}

impl TimeInterval {
    /// Create an interval, rejecting zero-length, reversed, and non-finite bounds
    pub fn new(start: f64, end: f64) -> Option<Self> {
        if !start.is_finite() || !end.is_finite() || end <= start {
            return None;
        }
        Some(Self { start, end })
    }

    /// Interval length in seconds
    pub fn length(&self) -> f64 {
        self.end - self.start
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.3}s - {:.3}s]", self.start, self.end)
    }
}

/// Raw cut record as stored in a marker file, in file order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutMarker {
    pub start: f64,
    pub end: f64,
    /// Marker type column; always 0 for commercial cuts
    pub kind: u8,
}

impl CutMarker {
    /// Create a commercial cut marker
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end, kind: 0 }
    }

    /// Markers with identical bounds carry no information
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }

    /// Shift both bounds left by `offset`, clamping at zero
    pub fn shifted(&self, offset: f64) -> Self {
        Self {
            start: (self.start - offset).max(0.0),
            end: (self.end - offset).max(0.0),
            kind: self.kind,
        }
    }
}

/// Portion of the source timeline to retain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeepSegment {
    pub start: f64,
    pub end: f64,
}

impl KeepSegment {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Segment length in seconds
    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    /// Start and end rounded to whole seconds, used for intermediate file naming
    pub fn rounded_bounds(&self) -> (i64, i64) {
        (self.start.round() as i64, self.end.round() as i64)
    }

    pub fn interval(&self) -> TimeInterval {
        TimeInterval {
            start: self.start,
            end: self.end,
        }
    }
}

impl fmt::Display for KeepSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "keep {}", self.interval())
    }
}

/// Chapter entry derived from a keep-segment start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterMarker {
    /// 1-based chapter number
    pub index: u32,
    pub time_seconds: f64,
    pub label: String,
}

/// Ordered chapters plus the total duration used for the trailing sentinel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterList {
    pub chapters: Vec<ChapterMarker>,
    /// Source duration, or the compensated duration when the file is already cut
    pub total_duration: f64,
}

impl ChapterList {
    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    /// Chapter start times in order
    pub fn times(&self) -> Vec<f64> {
        self.chapters.iter().map(|c| c.time_seconds).collect()
    }
}

/// Source timeline that marker timestamps are interpreted against
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    /// Total source duration in seconds; `<= 0` means unknown
    pub duration: f64,
    /// Seconds already trimmed from the front of the physical file
    pub offset_seconds: f64,
    /// Shortest keep-segment worth extracting; 0 disables merging of short segments
    pub minimum_segment_seconds: f64,
}

impl Timeline {
    /// Create a timeline; negative offsets and thresholds are clamped to zero
    pub fn new(duration: f64, offset_seconds: f64, minimum_segment_seconds: f64) -> Self {
        Self {
            duration,
            offset_seconds: offset_seconds.max(0.0),
            minimum_segment_seconds: minimum_segment_seconds.max(0.0),
        }
    }

    /// A timeline without a positive duration cannot bound its final segment
    pub fn is_usable(&self) -> bool {
        self.duration.is_finite() && self.duration > 0.0
    }

    /// Convert cut markers into ordered keep-segments
    pub fn keep_segments(&self, markers: &[CutMarker]) -> Result<Vec<KeepSegment>, TimelineError> {
        TimelineRules::parse_markers(
            markers,
            self.duration,
            self.offset_seconds,
            self.minimum_segment_seconds,
        )
    }

    /// Convert keep-segments back into cut markers
    pub fn cut_markers(&self, segments: &[KeepSegment]) -> Vec<CutMarker> {
        TimelineRules::build_cut_markers(
            segments,
            self.duration,
            self.offset_seconds,
            self.minimum_segment_seconds,
        )
    }

    /// Derive chapters for the original (`already_cut == false`) or the cut file
    pub fn chapters(
        &self,
        segments: &[KeepSegment],
        already_cut: bool,
    ) -> Result<ChapterList, TimelineError> {
        TimelineRules::derive_chapters(segments, self.duration, already_cut)
    }
}
