// Unit tests for timeline rules

use super::*;
use proptest::prelude::*;

fn markers(pairs: &[(f64, f64)]) -> Vec<CutMarker> {
    pairs.iter().map(|&(s, e)| CutMarker::new(s, e)).collect()
}

fn keeps(pairs: &[(f64, f64)]) -> Vec<KeepSegment> {
    pairs.iter().map(|&(s, e)| KeepSegment::new(s, e)).collect()
}

#[test]
fn test_parse_markers_end_to_end_example() {
    let cuts = markers(&[(0.0, 3.0), (40.0, 45.0), (97.0, 100.0)]);
    let segments = TimelineRules::parse_markers(&cuts, 100.0, 0.0, 5.0).unwrap();
    assert_eq!(segments, keeps(&[(3.0, 40.0), (45.0, 97.0)]));
}

#[test]
fn test_parse_markers_no_markers_is_empty_not_error() {
    let segments = TimelineRules::parse_markers(&[], 100.0, 0.0, 5.0).unwrap();
    assert!(segments.is_empty());

    // Duration is not needed when there is nothing to bound
    let segments = TimelineRules::parse_markers(&[], 0.0, 0.0, 5.0).unwrap();
    assert!(segments.is_empty());
}

#[test]
fn test_parse_markers_ignores_degenerate_and_reversed() {
    let cuts = markers(&[(10.0, 10.0), (30.0, 20.0)]);
    let segments = TimelineRules::parse_markers(&cuts, 100.0, 0.0, 0.0).unwrap();
    assert!(segments.is_empty());
}

#[test]
fn test_parse_markers_requires_duration_for_tail() {
    let cuts = markers(&[(20.0, 30.0)]);
    let err = TimelineRules::parse_markers(&cuts, 0.0, 0.0, 5.0).unwrap_err();
    assert!(matches!(err, TimelineError::InvalidDuration { .. }));

    let head_only = markers(&[(0.0, 30.0)]);
    let err = TimelineRules::parse_markers(&head_only, -1.0, 0.0, 5.0).unwrap_err();
    assert!(matches!(err, TimelineError::InvalidDuration { .. }));
}

#[test]
fn test_parse_markers_head_cut_only_keeps_remainder() {
    let cuts = markers(&[(0.0, 30.0)]);
    let segments = TimelineRules::parse_markers(&cuts, 100.0, 0.0, 5.0).unwrap();
    assert_eq!(segments, keeps(&[(30.0, 100.0)]));
}

#[test]
fn test_parse_markers_drops_short_gap_between_cuts() {
    // 3 second gap between the two cuts is not worth extracting
    let cuts = markers(&[(20.0, 30.0), (33.0, 40.0)]);
    let segments = TimelineRules::parse_markers(&cuts, 100.0, 0.0, 5.0).unwrap();
    assert_eq!(segments, keeps(&[(0.0, 20.0), (40.0, 100.0)]));
}

#[test]
fn test_parse_markers_short_gaps_only_yield_nothing() {
    // Mid cut clears the head flag; the dropped gap leaves no segment to bound
    let cuts = markers(&[(0.0, 3.0), (6.0, 9.0)]);
    let segments = TimelineRules::parse_markers(&cuts, 100.0, 0.0, 5.0).unwrap();
    assert!(segments.is_empty());
}

#[test]
fn test_parse_markers_applies_offset() {
    let cuts = markers(&[(12.0, 20.0), (50.0, 60.0)]);
    let segments = TimelineRules::parse_markers(&cuts, 90.0, 10.0, 0.0).unwrap();
    assert_eq!(segments, keeps(&[(0.0, 2.0), (10.0, 40.0), (50.0, 90.0)]));
}

#[test]
fn test_parse_markers_offset_turns_cut_into_head_cut() {
    let cuts = markers(&[(10.0, 20.0), (50.0, 60.0)]);
    let segments = TimelineRules::parse_markers(&cuts, 90.0, 8.0, 5.0).unwrap();
    assert_eq!(segments, keeps(&[(12.0, 42.0), (52.0, 90.0)]));
}

#[test]
fn test_parse_markers_overlapping_cuts_extend() {
    let cuts = markers(&[(20.0, 30.0), (25.0, 40.0), (70.0, 80.0)]);
    let segments = TimelineRules::parse_markers(&cuts, 100.0, 0.0, 0.0).unwrap();
    assert_eq!(segments, keeps(&[(0.0, 20.0), (40.0, 70.0), (80.0, 100.0)]));
}

#[test]
fn test_parse_markers_clamps_to_duration() {
    let cuts = markers(&[(20.0, 30.0), (95.0, 130.0)]);
    let segments = TimelineRules::parse_markers(&cuts, 100.0, 0.0, 0.0).unwrap();
    assert_eq!(segments, keeps(&[(0.0, 20.0), (30.0, 95.0)]));
}

#[test]
fn test_parse_markers_zero_threshold_is_pure_arithmetic() {
    let cuts = markers(&[(0.0, 1.0), (1.5, 2.0), (99.5, 100.0)]);
    let segments = TimelineRules::parse_markers(&cuts, 100.0, 0.0, 0.0).unwrap();
    assert_eq!(segments, keeps(&[(1.0, 1.5), (2.0, 99.5)]));
}

#[test]
fn test_build_cut_markers_includes_leading_and_trailing() {
    let segments = keeps(&[(3.0, 40.0), (45.0, 97.0)]);
    let cuts = TimelineRules::build_cut_markers(&segments, 100.0, 0.0, 0.0);
    assert_eq!(cuts, markers(&[(0.0, 3.0), (40.0, 45.0), (97.0, 100.0)]));
}

#[test]
fn test_build_cut_markers_drops_short_gaps() {
    let segments = keeps(&[(0.0, 40.0), (42.0, 97.0)]);
    let cuts = TimelineRules::build_cut_markers(&segments, 100.0, 0.0, 5.0);
    assert!(cuts.is_empty());
}

#[test]
fn test_build_cut_markers_applies_offset() {
    let segments = keeps(&[(10.0, 40.0), (60.0, 100.0)]);
    let cuts = TimelineRules::build_cut_markers(&segments, 100.0, 5.0, 0.0);
    assert_eq!(cuts, markers(&[(0.0, 5.0), (35.0, 55.0)]));
}

#[test]
fn test_build_cut_markers_empty_input() {
    assert!(TimelineRules::build_cut_markers(&[], 100.0, 0.0, 0.0).is_empty());
}

#[test]
fn test_derive_chapters_compensation() {
    let segments = keeps(&[(0.0, 10.0), (20.0, 30.0)]);

    let cut = TimelineRules::derive_chapters(&segments, 30.0, true).unwrap();
    assert_eq!(cut.times(), vec![0.0, 10.0]);
    assert_eq!(cut.total_duration, 20.0);

    let uncut = TimelineRules::derive_chapters(&segments, 30.0, false).unwrap();
    assert_eq!(uncut.times(), vec![0.0, 20.0]);
    assert_eq!(uncut.total_duration, 30.0);
}

#[test]
fn test_derive_chapters_leading_gap_is_compensated() {
    let segments = keeps(&[(3.0, 40.0), (45.0, 97.0)]);
    let list = TimelineRules::derive_chapters(&segments, 100.0, true).unwrap();
    assert_eq!(list.times(), vec![0.0, 37.0]);
    assert_eq!(list.total_duration, 89.0);
    assert_eq!(list.chapters[1].index, 2);
    assert_eq!(list.chapters[1].label, "Chapter 2");
}

#[test]
fn test_derive_chapters_empty_is_error() {
    let err = TimelineRules::derive_chapters(&[], 100.0, false).unwrap_err();
    assert_eq!(err, TimelineError::EmptyTimeline);
}

/// Sorted, non-overlapping, non-adjacent cuts inside `[0, duration)`; the first may start at 0
fn cut_set() -> impl Strategy<Value = (f64, Vec<CutMarker>)> {
    (
        200u32..2000,
        any::<bool>(),
        prop::collection::vec((1u32..60, 1u32..60), 0..12),
    )
        .prop_map(|(duration_secs, head_cut, spans)| {
            let duration = duration_secs as f64;
            let mut cursor = 0.0;
            let mut cuts = Vec::new();
            for (position, (gap, len)) in spans.into_iter().enumerate() {
                let start = if position == 0 && head_cut {
                    0.0
                } else {
                    cursor + gap as f64 * 0.25
                };
                let end = start + len as f64 * 0.25;
                if end >= duration {
                    break;
                }
                cuts.push(CutMarker::new(start, end));
                cursor = end;
            }
            (duration, cuts)
        })
}

proptest! {
    #[test]
    fn prop_keep_segments_avoid_every_cut((duration, cuts) in cut_set(), min_seg in 0u32..20) {
        let min_seg = min_seg as f64 * 0.5;
        let segments = TimelineRules::parse_markers(&cuts, duration, 0.0, min_seg).unwrap();

        let mut cursor = 0.0;
        for segment in &segments {
            prop_assert!(segment.start >= cursor);
            prop_assert!(segment.end > segment.start);
            prop_assert!(segment.end <= duration);
            cursor = segment.end;

            for cut in &cuts {
                prop_assert!(
                    segment.end <= cut.start || segment.start >= cut.end,
                    "segment {:?} overlaps cut {:?}", segment, cut
                );
            }
        }
    }

    #[test]
    fn prop_without_threshold_segments_fill_everything_but_the_cuts((duration, cuts) in cut_set()) {
        let segments = TimelineRules::parse_markers(&cuts, duration, 0.0, 0.0).unwrap();
        if cuts.is_empty() {
            prop_assert!(segments.is_empty());
        } else {
            let kept: f64 = segments.iter().map(|s| s.length()).sum();
            let cut: f64 = cuts.iter().map(|c| c.end - c.start).sum();
            prop_assert!((kept + cut - duration).abs() < 1e-6);
        }
    }

    #[test]
    fn prop_no_segment_shorter_than_threshold((duration, cuts) in cut_set(), min_seg in 0u32..20) {
        let min_seg = min_seg as f64 * 0.5;
        let segments = TimelineRules::parse_markers(&cuts, duration, 0.0, min_seg).unwrap();
        for segment in &segments {
            prop_assert!(segment.length() > min_seg);
        }
    }

    #[test]
    fn prop_offset_matches_preshifted_markers((duration, cuts) in cut_set(), offset in 0u32..80, min_seg in 0u32..10) {
        let offset = offset as f64 * 0.5;
        let min_seg = min_seg as f64;
        let preshifted: Vec<CutMarker> = cuts.iter().map(|c| c.shifted(offset)).collect();

        let expected = TimelineRules::parse_markers(&preshifted, duration, 0.0, min_seg).unwrap();
        let actual = TimelineRules::parse_markers(&cuts, duration, offset, min_seg).unwrap();
        prop_assert_eq!(expected, actual);
    }

    #[test]
    fn prop_build_then_parse_round_trips((duration, cuts) in cut_set()) {
        let segments = TimelineRules::parse_markers(&cuts, duration, 0.0, 0.0).unwrap();
        let rebuilt = TimelineRules::build_cut_markers(&segments, duration, 0.0, 0.0);
        let reparsed = TimelineRules::parse_markers(&rebuilt, duration, 0.0, 0.0).unwrap();
        prop_assert_eq!(segments, reparsed);
    }
}
