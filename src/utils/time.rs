//! Time formatting for marker, chapter and tool argument text

/// Format seconds as `HH:MM:SS.fff`, rounding to the nearest millisecond
pub fn format_hms_millis(seconds: f64) -> String {
    let total_millis = (seconds.max(0.0) * 1000.0).round() as u64;
    let hours = total_millis / 3_600_000;
    let minutes = (total_millis % 3_600_000) / 60_000;
    let secs = (total_millis % 60_000) / 1000;
    let millis = total_millis % 1000;
    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, millis)
}

/// Format seconds with invariant decimal notation (always `.`, three decimals)
pub fn format_seconds(seconds: f64) -> String {
    format!("{:.3}", seconds)
}

/// Whole milliseconds, as used by FFMETADATA chapter bounds
pub fn to_millis(seconds: f64) -> u64 {
    (seconds.max(0.0) * 1000.0).round() as u64
}

/// Parse a floating point seconds value written with invariant formatting
pub fn parse_seconds(text: &str) -> Option<f64> {
    let value = text.trim().parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hms_millis() {
        assert_eq!(format_hms_millis(0.0), "00:00:00.000");
        assert_eq!(format_hms_millis(3.0), "00:00:03.000");
        assert_eq!(format_hms_millis(3723.4567), "01:02:03.457");
        assert_eq!(format_hms_millis(-2.0), "00:00:00.000");
    }

    #[test]
    fn test_format_seconds_is_invariant() {
        assert_eq!(format_seconds(12.5), "12.500");
        assert_eq!(format_seconds(0.0), "0.000");
    }

    #[test]
    fn test_parse_seconds() {
        assert_eq!(parse_seconds(" 42.25 "), Some(42.25));
        assert_eq!(parse_seconds("1e2"), Some(100.0));
        assert_eq!(parse_seconds("abc"), None);
        assert_eq!(parse_seconds("inf"), None);
        assert_eq!(parse_seconds("NaN"), None);
    }

    #[test]
    fn test_to_millis() {
        assert_eq!(to_millis(1.2345), 1235);
        assert_eq!(to_millis(-1.0), 0);
    }
}
