//! Label field extraction
//!
//! Device labels mark their fields with `SN:` (serial number), `PIN:` and
//! `PW:` (password). Extraction scans every recognized line against each
//! marker independently; when several lines carry the same marker, the last
//! one wins. OCR tends to inject spurious spaces between password glyphs, so
//! the `PW:` value is stripped of all whitespace rather than just trimmed.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static SERIAL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"SN:(.+)").expect("regex"));
static PIN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"PIN:(.+)").expect("regex"));
static PASSWORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"PW:\s*(.+)").expect("regex"));

/// Fields read off a single frame's recognized text.
///
/// Each field is independently optional; a marker that matched nothing stays
/// `None`, which is distinct from a marker whose value trimmed down to an
/// empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    /// Value after the `SN:` marker, trimmed.
    pub serial_number: Option<String>,
    /// Value after the `PIN:` marker, trimmed.
    pub pin: Option<String>,
    /// Value after the `PW:` marker, with all whitespace removed.
    pub password: Option<String>,
    /// Every recognized line joined by newline, in recognition order.
    pub full_text: String,
}

impl ExtractionResult {
    /// True once all three fields have been read.
    pub fn is_complete(&self) -> bool {
        self.serial_number.is_some() && self.pin.is_some() && self.password.is_some()
    }
}

/// Scan recognized lines, in order, for the three label markers.
///
/// The markers are independent patterns, so one line may set any subset of
/// the fields. Later matches overwrite earlier ones.
pub fn extract_fields<'a>(lines: impl IntoIterator<Item = &'a str>) -> ExtractionResult {
    let lines: Vec<&str> = lines.into_iter().collect();

    let mut result = ExtractionResult {
        full_text: lines.join("\n"),
        ..Default::default()
    };

    for line in &lines {
        if let Some(caps) = SERIAL_RE.captures(line) {
            result.serial_number = Some(caps[1].trim().to_string());
        }
        if let Some(caps) = PIN_RE.captures(line) {
            result.pin = Some(caps[1].trim().to_string());
        }
        if let Some(caps) = PASSWORD_RE.captures(line) {
            result.password = Some(caps[1].split_whitespace().collect());
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(lines: &[&str]) -> ExtractionResult {
        extract_fields(lines.iter().copied())
    }

    #[test]
    fn test_reads_all_three_fields_from_one_frame() {
        let result = extract(&["Device Info", "SN: ABC123", "PIN:4567", "PW: a b c9"]);

        assert_eq!(result.serial_number.as_deref(), Some("ABC123"));
        assert_eq!(result.pin.as_deref(), Some("4567"));
        assert_eq!(result.password.as_deref(), Some("abc9"));
        assert_eq!(
            result.full_text,
            "Device Info\nSN: ABC123\nPIN:4567\nPW: a b c9"
        );
        assert!(result.is_complete());
    }

    #[test]
    fn test_unmatched_markers_stay_absent() {
        let result = extract(&["SN:X1", "SN:X2"]);

        assert_eq!(result.serial_number.as_deref(), Some("X2"));
        assert_eq!(result.pin, None);
        assert_eq!(result.password, None);
        assert!(!result.is_complete());
    }

    #[test]
    fn test_no_markers_at_all() {
        let result = extract(&["nothing of interest", "on this label"]);

        assert_eq!(result.serial_number, None);
        assert_eq!(result.pin, None);
        assert_eq!(result.password, None);
        assert_eq!(result.full_text, "nothing of interest\non this label");
    }

    #[test]
    fn test_last_matching_line_wins() {
        let result = extract(&["PIN:1111", "PW:first", "PIN:2222", "PW:second"]);

        assert_eq!(result.pin.as_deref(), Some("2222"));
        assert_eq!(result.password.as_deref(), Some("second"));
    }

    #[test]
    fn test_password_loses_internal_whitespace_but_serial_keeps_it() {
        let result = extract(&["SN:  AB 12  ", "PW: w i-fi 99"]);

        assert_eq!(result.serial_number.as_deref(), Some("AB 12"));
        assert_eq!(result.password.as_deref(), Some("wi-fi99"));
    }

    #[test]
    fn test_marker_with_only_whitespace_is_present_but_empty() {
        let result = extract(&["PIN:   "]);

        // Matched-but-blank is not the same as absent.
        assert_eq!(result.pin.as_deref(), Some(""));
        assert_eq!(result.serial_number, None);
    }

    #[test]
    fn test_one_line_may_set_several_fields() {
        let result = extract(&["SN:A1B2 PIN:9999"]);

        // Markers are independent patterns; the serial capture runs to the
        // end of the line.
        assert_eq!(result.serial_number.as_deref(), Some("A1B2 PIN:9999"));
        assert_eq!(result.pin.as_deref(), Some("9999"));
    }

    #[test]
    fn test_empty_input_yields_empty_full_text() {
        let result = extract(&[]);

        assert_eq!(result.full_text, "");
        assert!(!result.is_complete());
    }
}
