//! Duration codec for race times.
//!
//! Parses and formats elapsed-time strings (`HH:MM:SS` / `MM:SS`) to and
//! from whole seconds. Pure functions, no I/O; invalid input yields `None`.

use regex::Regex;
use std::sync::LazyLock;

static HMS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2}):([0-5]\d):([0-5]\d)$").expect("valid HH:MM:SS regex")
});

static MS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}):([0-5]\d)$").expect("valid MM:SS regex"));

/// Parse a duration string into total seconds.
///
/// Accepts `H{1,2}:MM:SS` or `M{1,2}:SS`. Minutes and seconds above 59,
/// negative values and any other shape are rejected. Validation is a strict
/// regex match before any arithmetic.
pub fn parse_duration(text: &str) -> Option<u32> {
    if let Some(caps) = HMS_RE.captures(text) {
        let hours: u32 = caps[1].parse().ok()?;
        let minutes: u32 = caps[2].parse().ok()?;
        let seconds: u32 = caps[3].parse().ok()?;
        return Some(hours * 3600 + minutes * 60 + seconds);
    }

    if let Some(caps) = MS_RE.captures(text) {
        let minutes: u32 = caps[1].parse().ok()?;
        let seconds: u32 = caps[2].parse().ok()?;
        return Some(minutes * 60 + seconds);
    }

    None
}

/// Format total seconds as canonical `HH:MM:SS`.
///
/// Every field is zero-padded to two digits. Durations of 24 hours or more
/// keep growing the hour field; there is no day rollover.
pub fn format_duration(total_seconds: u32) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::{format_duration, parse_duration};

    #[test]
    fn test_parse_hms() {
        assert_eq!(parse_duration("00:45:30"), Some(45 * 60 + 30));
        assert_eq!(parse_duration("01:08:30"), Some(3600 + 8 * 60 + 30));
        assert_eq!(parse_duration("1:08:30"), Some(3600 + 8 * 60 + 30));
    }

    #[test]
    fn test_parse_ms() {
        assert_eq!(parse_duration("45:30"), Some(45 * 60 + 30));
        assert_eq!(parse_duration("5:07"), Some(5 * 60 + 7));
    }

    #[test]
    fn test_parse_rejects_out_of_range_fields() {
        assert_eq!(parse_duration("00:60:00"), None);
        assert_eq!(parse_duration("00:00:60"), None);
        assert_eq!(parse_duration("12:99"), None);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("abc"), None);
        assert_eq!(parse_duration("-1:00:00"), None);
        assert_eq!(parse_duration("1:2:3"), None);
        assert_eq!(parse_duration("01:02:03:04"), None);
        assert_eq!(parse_duration(" 01:02:03"), None);
    }

    #[test]
    fn test_format_zero_pads() {
        assert_eq!(format_duration(0), "00:00:00");
        assert_eq!(format_duration(7), "00:00:07");
        assert_eq!(format_duration(45 * 60 + 30), "00:45:30");
    }

    #[test]
    fn test_format_beyond_24_hours() {
        // 25h, no day rollover
        assert_eq!(format_duration(25 * 3600), "25:00:00");
    }

    #[test]
    fn test_roundtrip() {
        for seconds in [0u32, 59, 60, 3599, 3600, 4 * 3600 + 21 * 60 + 9, 90_000] {
            assert_eq!(
                parse_duration(&format_duration(seconds)),
                Some(seconds),
                "roundtrip failed for {} seconds",
                seconds
            );
        }
    }
}
