//! Keep-list import: third-party project files that list ranges to retain

use crate::domain::errors::TimelineError;
use crate::domain::model::{CutMarker, KeepSegment, TimeInterval, Timeline};
use crate::utils::time::parse_seconds;

/// Parse `start end` pairs, one per line, into ordered keep-segments.
///
/// Zero-length and reversed ranges are discarded; the rest are sorted by start.
pub fn parse_keep_list(text: &str) -> Result<Vec<KeepSegment>, TimelineError> {
    let mut segments = Vec::new();

    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.split_whitespace();
        let (Some(start), Some(end)) = (
            fields.next().and_then(parse_seconds),
            fields.next().and_then(parse_seconds),
        ) else {
            return Err(TimelineError::parse(number + 1, line));
        };

        if let Some(range) = TimeInterval::new(start, end) {
            segments.push(KeepSegment::new(range.start, range.end));
        }
    }

    segments.sort_by(|a, b| a.start.total_cmp(&b.start));
    Ok(segments)
}

/// Convert keep-list text into the cut markers of a marker file
pub fn import_keep_list(text: &str, timeline: &Timeline) -> Result<Vec<CutMarker>, TimelineError> {
    if !timeline.is_usable() {
        return Err(TimelineError::InvalidDuration {
            duration: timeline.duration,
        });
    }
    let segments = parse_keep_list(text)?;
    Ok(timeline.cut_markers(&segments))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keep_list_sorts_and_skips_empty_ranges() {
        let text = "# exported ranges\n45 97\n3 40\n50 50\n";
        let segments = parse_keep_list(text).unwrap();
        assert_eq!(
            segments,
            vec![KeepSegment::new(3.0, 40.0), KeepSegment::new(45.0, 97.0)]
        );
    }

    #[test]
    fn test_import_produces_cut_markers() {
        let timeline = Timeline::new(100.0, 0.0, 5.0);
        let cuts = import_keep_list("3 40\n46 97\n", &timeline).unwrap();
        assert_eq!(
            cuts,
            vec![CutMarker::new(0.0, 3.0), CutMarker::new(40.0, 46.0)]
        );
    }

    #[test]
    fn test_import_requires_duration() {
        let timeline = Timeline::new(0.0, 0.0, 5.0);
        let err = import_keep_list("3 40\n", &timeline).unwrap_err();
        assert!(matches!(err, TimelineError::InvalidDuration { .. }));
    }

    #[test]
    fn test_malformed_keep_line() {
        let err = parse_keep_list("3 40\n45\n").unwrap_err();
        assert_eq!(err, TimelineError::parse(2, "45"));
    }
}
