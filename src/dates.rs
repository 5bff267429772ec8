//! Date parsing with explicit, ordered format tables.
//!
//! Every place the pipeline meets a date — transcript timestamps, dates
//! embedded in image filenames, dates typed into receipts — goes through one
//! of the format lists below. Each list is tried in order and the first
//! format that parses wins; callers always get a tagged `Option`, never a
//! panic or an implicit fallback chain.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

/// Formats a WhatsApp transcript timestamp can take, in trial order.
///
/// The export this tool consumes writes `27/04/25, 12:44:30`; the dash
/// variant shows up in older exports.
pub const TIMESTAMP_FORMATS: &[&str] = &[
    "%d/%m/%y, %H:%M:%S",
    "%d/%m/%y, %H:%M",
    "%d-%m-%Y, %H:%M:%S",
    "%d-%m-%Y, %H:%M",
];

/// Whether a month-normalization format carries a time component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormatKind {
    DateTime,
    DateOnly,
}

/// Formats accepted when normalizing an arbitrary date string to `YYYY-MM`,
/// in trial order. Receipt screenshots spell dates many ways.
const MONTH_FORMATS: &[(&str, FormatKind)] = &[
    ("%d/%m/%y, %H:%M:%S", FormatKind::DateTime), // 27/04/25, 12:44:30
    ("%d/%m/%y, %H:%M", FormatKind::DateTime),    // 27/04/25, 12:44
    ("%d %b %Y", FormatKind::DateOnly),           // 26 Apr 2025
    ("%d %B %Y", FormatKind::DateOnly),           // 26 April 2025
    ("%d-%m-%Y", FormatKind::DateOnly),           // 26-04-2025
    ("%d/%m/%Y", FormatKind::DateOnly),           // 26/04/2025
    ("%Y-%m-%d", FormatKind::DateOnly),           // 2025-04-26
    ("%B %d, %Y", FormatKind::DateOnly),          // April 26, 2025
    ("%b %d, %Y", FormatKind::DateOnly),          // Apr 26, 2025
    ("%d %b %Y, %I:%M %p", FormatKind::DateTime), // 27 Apr 2025, 11:35 am
];

// ASCII digits only: `\d` would also match Unicode digits, which downstream
// byte-offset field comparisons cannot handle.
static EMBEDDED_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]{4}-[0-9]{2}-[0-9]{2})").expect("invalid regex"));

static PHOTO_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"PHOTO-([0-9]{4}-[0-9]{2}-[0-9]{2})").expect("invalid regex"));

/// Parses a raw transcript timestamp such as `27/04/25, 12:44:30`.
///
/// Returns `None` if no format in [`TIMESTAMP_FORMATS`] matches.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Extracts the calendar date from a raw transcript timestamp.
pub fn timestamp_date(raw: &str) -> Option<NaiveDate> {
    parse_timestamp(raw).map(|dt| dt.date())
}

/// Normalizes an arbitrary date string to `YYYY-MM` for month comparison.
///
/// Tries each entry of the month format table in order; the first success
/// wins. Unparseable input yields `None` (reported by the caller, never
/// fatal).
pub fn normalize_month(raw: &str) -> Option<String> {
    for (fmt, kind) in MONTH_FORMATS {
        let date = match kind {
            FormatKind::DateTime => NaiveDateTime::parse_from_str(raw, fmt)
                .ok()
                .map(|dt| dt.date()),
            FormatKind::DateOnly => NaiveDate::parse_from_str(raw, fmt).ok(),
        };
        if let Some(d) = date {
            return Some(d.format("%Y-%m").to_string());
        }
    }
    None
}

/// Returns the first embedded `YYYY-MM-DD` substring of a filename, verbatim.
///
/// This is a textual match; the digits are not validated as a real calendar
/// date. Use [`embedded_date`] when an actual date value is needed.
pub fn embedded_date_str(name: &str) -> Option<&str> {
    EMBEDDED_DATE_RE
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Parses the embedded `YYYY-MM-DD` date out of a filename, if present and
/// valid.
pub fn embedded_date(name: &str) -> Option<NaiveDate> {
    embedded_date_str(name).and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

/// Formats a raw transcript timestamp for the export, e.g.
/// `"27 Apr 2025, 12:44 PM"`. Returns `None` when the raw value doesn't
/// parse; callers keep the raw string in that case.
pub fn format_sent_date(raw: &str) -> Option<String> {
    parse_timestamp(raw).map(|dt| dt.format("%d %b %Y, %I:%M %p").to_string())
}

/// Derives a display date like `"27 Apr 2025"` from a `PHOTO-YYYY-MM-DD`
/// filename segment. Used to backfill a receipt whose screenshot carried no
/// readable date.
pub fn date_from_filename(name: &str) -> Option<String> {
    let raw = PHOTO_DATE_RE.captures(name)?.get(1)?.as_str();
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    Some(date.format("%d %b %Y").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_slash() {
        let dt = parse_timestamp("27/04/25, 12:44:30").unwrap();
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2025, 4, 27).unwrap());
    }

    #[test]
    fn test_parse_timestamp_dash() {
        let dt = parse_timestamp("27-04-2025, 12:44:30").unwrap();
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2025, 4, 27).unwrap());
    }

    #[test]
    fn test_parse_timestamp_no_seconds() {
        assert!(parse_timestamp("27/04/25, 12:44").is_some());
    }

    #[test]
    fn test_parse_timestamp_garbage() {
        assert!(parse_timestamp("yesterday at noon").is_none());
    }

    #[test]
    fn test_normalize_month_formats() {
        assert_eq!(normalize_month("27/04/25, 12:44:30").as_deref(), Some("2025-04"));
        assert_eq!(normalize_month("26 Apr 2025").as_deref(), Some("2025-04"));
        assert_eq!(normalize_month("26 April 2025").as_deref(), Some("2025-04"));
        assert_eq!(normalize_month("26-04-2025").as_deref(), Some("2025-04"));
        assert_eq!(normalize_month("2025-04-26").as_deref(), Some("2025-04"));
        assert_eq!(normalize_month("April 26, 2025").as_deref(), Some("2025-04"));
        assert_eq!(normalize_month("27 Apr 2025, 11:35 am").as_deref(), Some("2025-04"));
    }

    #[test]
    fn test_normalize_month_unparseable() {
        assert_eq!(normalize_month("not a date"), None);
        assert_eq!(normalize_month(""), None);
    }

    #[test]
    fn test_embedded_date_str() {
        assert_eq!(
            embedded_date_str("00000001-PHOTO-2025-04-27-12-44-28.jpg"),
            Some("2025-04-27")
        );
        assert_eq!(embedded_date_str("receipt.jpg"), None);
    }

    #[test]
    fn test_embedded_date_requires_ascii_digits() {
        // Unicode digits are not part of the export convention and must not
        // match; downstream code slices the captured fields by byte offset.
        assert_eq!(embedded_date_str("receipt-2025-०१-१०.jpg"), None);
        assert_eq!(date_from_filename("x-PHOTO-2025-०१-१०.jpg"), None);
    }

    #[test]
    fn test_embedded_date_invalid_calendar_date() {
        // Textual match succeeds, parse does not.
        assert_eq!(embedded_date_str("scan-2025-13-40.png"), Some("2025-13-40"));
        assert_eq!(embedded_date("scan-2025-13-40.png"), None);
    }

    #[test]
    fn test_format_sent_date() {
        assert_eq!(
            format_sent_date("27/04/25, 12:44:30").as_deref(),
            Some("27 Apr 2025, 12:44 PM")
        );
        assert_eq!(format_sent_date("???"), None);
    }

    #[test]
    fn test_date_from_filename() {
        assert_eq!(
            date_from_filename("00000001-PHOTO-2025-04-27-12-44-28.jpg").as_deref(),
            Some("27 Apr 2025")
        );
        assert_eq!(date_from_filename("00000002-receipt.jpg"), None);
    }
}
