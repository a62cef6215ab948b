//! Line-oriented marker file format: `<start>\t<end>\t<kind>` per cut

use crate::domain::errors::TimelineError;
use crate::domain::model::CutMarker;
use crate::utils::time::{format_seconds, parse_seconds};

/// Parse marker file text into cut markers, in file order.
///
/// Fields may be separated by any whitespace. Blank lines are skipped. The
/// kind column is optional and defaults to 0.
pub fn parse_marker_text(text: &str) -> Result<Vec<CutMarker>, TimelineError> {
    let mut markers = Vec::new();

    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 2 {
            return Err(TimelineError::parse(number + 1, line));
        }
        let (Some(start), Some(end)) = (parse_seconds(fields[0]), parse_seconds(fields[1])) else {
            return Err(TimelineError::parse(number + 1, line));
        };
        let kind = match fields.get(2) {
            Some(field) => field
                .parse::<u8>()
                .map_err(|_| TimelineError::parse(number + 1, line))?,
            None => 0,
        };

        markers.push(CutMarker { start, end, kind });
    }

    Ok(markers)
}

/// Render cut markers with a single tab between fields; degenerate markers are omitted
pub fn format_marker_text(markers: &[CutMarker]) -> String {
    markers
        .iter()
        .filter(|marker| !marker.is_degenerate())
        .map(|marker| {
            format!(
                "{}\t{}\t{}\n",
                format_seconds(marker.start),
                format_seconds(marker.end),
                marker.kind
            )
        })
        .collect()
}

/// Copy marker text line by line, dropping lines whose start equals their end.
///
/// Lines that do not parse are kept as they are so the round-trip parse can
/// report them with their line number.
pub fn strip_degenerate_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        let mut fields = line.split_whitespace();
        let bounds = (
            fields.next().and_then(parse_seconds),
            fields.next().and_then(parse_seconds),
        );
        if let (Some(start), Some(end)) = bounds {
            if start == end {
                continue;
            }
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}
