// Domain rules - Cut-list / keep-list conversion and chapter derivation

use crate::domain::errors::TimelineError;
use crate::domain::model::*;

/// Timeline conversion rules.
///
/// The same `minimum_segment_seconds` threshold decides both whether a marker is a
/// leading cut and whether a mid-timeline keep gap is too small to extract. With a
/// threshold of zero both checks reduce to plain boundary comparisons.
pub struct TimelineRules;

impl TimelineRules {
    /// Turn ordered cut markers into keep-segments.
    ///
    /// Returns an empty list when no marker survives normalization; callers treat
    /// that as "nothing to remove".
    pub fn parse_markers(
        markers: &[CutMarker],
        duration: f64,
        offset_seconds: f64,
        minimum_segment_seconds: f64,
    ) -> Result<Vec<KeepSegment>, TimelineError> {
        let offset = offset_seconds.max(0.0);
        let min_seg = minimum_segment_seconds.max(0.0);
        let duration_known = duration.is_finite() && duration > 0.0;

        let mut segments = Vec::new();
        let mut last_cut = 0.0_f64;
        let mut head_cut_seen = false;

        for marker in markers {
            if marker.is_degenerate() {
                continue;
            }

            let adjusted = marker.shifted(offset);
            let end = if duration_known {
                adjusted.end.min(duration)
            } else {
                adjusted.end
            };
            let Some(cut) = TimeInterval::new(adjusted.start, end) else {
                continue;
            };

            if cut.start <= min_seg {
                // Leading cut: commercials before any real content
                last_cut = last_cut.max(cut.end);
                head_cut_seen = true;
            } else if cut.start > last_cut {
                if cut.start - last_cut > min_seg {
                    segments.push(KeepSegment::new(last_cut, cut.start));
                }
                last_cut = cut.end;
                head_cut_seen = false;
            } else {
                // Overlaps the previous cut
                last_cut = last_cut.max(cut.end);
            }
        }

        if !segments.is_empty() || head_cut_seen {
            if !duration_known {
                return Err(TimelineError::InvalidDuration { duration });
            }
            if duration - last_cut > min_seg {
                segments.push(KeepSegment::new(last_cut, duration));
            }
        }

        Ok(segments)
    }

    /// Turn ordered keep-segments back into cut markers.
    ///
    /// The gap before the first segment is always a cut. Gaps between segments and
    /// the trailing gap are dropped when not longer than the threshold. Every emitted
    /// marker is shifted by the offset the same way `parse_markers` shifts its input.
    pub fn build_cut_markers(
        segments: &[KeepSegment],
        duration: f64,
        offset_seconds: f64,
        minimum_segment_seconds: f64,
    ) -> Vec<CutMarker> {
        let offset = offset_seconds.max(0.0);
        let min_seg = minimum_segment_seconds.max(0.0);

        let mut cuts = Vec::new();
        let mut previous_end: Option<f64> = None;

        for segment in segments {
            match previous_end {
                None => {
                    if let Some(gap) = TimeInterval::new(0.0, segment.start) {
                        cuts.push(CutMarker::new(gap.start, gap.end));
                    }
                }
                Some(end) => {
                    if let Some(gap) = TimeInterval::new(end, segment.start) {
                        if gap.length() > min_seg {
                            cuts.push(CutMarker::new(gap.start, gap.end));
                        }
                    }
                }
            }
            previous_end = Some(segment.end);
        }

        if let Some(end) = previous_end {
            if duration.is_finite() && duration - end > min_seg {
                cuts.push(CutMarker::new(end, duration));
            }
        }

        cuts.into_iter()
            .map(|cut| cut.shifted(offset))
            .filter(|cut| cut.end > cut.start)
            .collect()
    }

    /// Derive one chapter per keep-segment start.
    ///
    /// When `already_cut` is set the chapter times are moved left by the total
    /// length removed before each segment, and the total duration shrinks to the
    /// sum of retained time.
    pub fn derive_chapters(
        segments: &[KeepSegment],
        duration: f64,
        already_cut: bool,
    ) -> Result<ChapterList, TimelineError> {
        if segments.is_empty() {
            return Err(TimelineError::EmptyTimeline);
        }

        let mut chapters = Vec::with_capacity(segments.len());
        let mut total_cut_so_far = 0.0;
        let mut previous_end = 0.0;

        for (position, segment) in segments.iter().enumerate() {
            let time_seconds = if already_cut {
                total_cut_so_far += (segment.start - previous_end).max(0.0);
                segment.start - total_cut_so_far
            } else {
                segment.start
            };
            previous_end = segment.end;

            let index = position as u32 + 1;
            chapters.push(ChapterMarker {
                index,
                time_seconds,
                label: format!("Chapter {}", index),
            });
        }

        let total_duration = if already_cut {
            previous_end - total_cut_so_far
        } else if duration.is_finite() && duration > 0.0 {
            duration
        } else {
            previous_end
        };

        Ok(ChapterList {
            chapters,
            total_duration,
        })
    }
}

#[cfg(test)]
mod tests;
