// LogMixer - core/timestamp.rs
//
// Block-start recognition. A line starts a new message block iff its fixed-
// width prefix parses as a timestamp. The recogniser sits behind a narrow
// trait so further layouts can be added without touching the segmenter.

use crate::util::constants;
use chrono::NaiveDateTime;

/// Decides whether a line begins a message block.
pub trait TimestampRecognizer: Send + Sync {
    /// Byte width of the timestamp prefix this recogniser consumes.
    fn width(&self) -> usize;

    /// Parse the line's prefix. `None` means "continuation line"; it is not
    /// an error condition for the caller.
    fn recognize(&self, line: &str) -> Option<NaiveDateTime>;
}

/// The `YYYY-MM-DD HH:MM:SS,mmm` layout.
#[derive(Debug, Clone)]
pub struct FixedLayout {
    format: &'static str,
    width: usize,
}

impl FixedLayout {
    pub fn new(format: &'static str, width: usize) -> Self {
        Self { format, width }
    }
}

impl Default for FixedLayout {
    fn default() -> Self {
        Self::new(constants::TIMESTAMP_FORMAT, constants::TIMESTAMP_WIDTH)
    }
}

impl TimestampRecognizer for FixedLayout {
    fn width(&self) -> usize {
        self.width
    }

    fn recognize(&self, line: &str) -> Option<NaiveDateTime> {
        // `get` also rejects a prefix that would split a multi-byte char.
        let prefix = line.get(..self.width)?;
        NaiveDateTime::parse_from_str(prefix, self.format).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    fn recognize(line: &str) -> Option<NaiveDateTime> {
        FixedLayout::default().recognize(line)
    }

    #[test]
    fn test_recognizes_block_start() {
        let ts = recognize("2025-01-01 10:00:00,123 start").expect("block start");
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(ts.date(), date);
        assert_eq!(ts.hour(), 10);
        assert_eq!(ts.nanosecond(), 123_000_000);
    }

    #[test]
    fn test_exact_width_line_is_start() {
        assert!(recognize("2025-01-01 10:00:00,000").is_some());
    }

    #[test]
    fn test_short_line_is_never_start() {
        assert!(recognize("2025-01-01 10:00:00").is_none());
        assert!(recognize("").is_none());
    }

    #[test]
    fn test_continuation_lines() {
        assert!(recognize("  at com.example.Foo(Foo.java:42)").is_none());
        assert!(recognize("Caused by: java.lang.IllegalStateException").is_none());
    }

    #[test]
    fn test_invalid_calendar_values_rejected() {
        assert!(recognize("2025-13-01 10:00:00,000 bad month").is_none());
        assert!(recognize("2025-01-01 25:00:00,000 bad hour").is_none());
    }

    #[test]
    fn test_dot_millis_separator_rejected() {
        assert!(recognize("2025-01-01 10:00:00.000 wrong separator").is_none());
    }

    #[test]
    fn test_multibyte_boundary_is_continuation() {
        // 22 ASCII bytes followed by a 3-byte char straddling the width.
        assert!(recognize("2025-01-01 10:00:00,00€ x").is_none());
    }

    #[test]
    fn test_width_matches_format() {
        assert_eq!(FixedLayout::default().width(), 23);
    }
}
