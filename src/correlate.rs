//! Image-to-contact correlation.
//!
//! Maps every on-disk image filename to the sender who posted it, using three
//! tiers in strict order — first success wins:
//!
//! 1. **Exact** — the filename appeared verbatim in an attachment marker.
//! 2. **Leading digits** — the filename's leading digit run equals an event
//!    filename's leading digit run (leading zeros stripped on both sides).
//!    Tolerates re-numbering that keeps the ordinal but changes decoration.
//! 3. **Closest date** — the filename embeds a `YYYY-MM-DD` date within one
//!    day of some event's send date.
//!
//! The mapping is total over the input set: an image no tier can place still
//! gets an entry with all fields null, so downstream enrichment only ever
//! needs a null check, never an existence check.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dates;
use crate::error::Result;
use crate::transcript::{AttachmentEvent, TranscriptParse};

/// Enrichment fields for one image, all absent when unmatched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedContact {
    /// Sender label, if matched
    pub name: Option<String>,
    /// Sender's best-effort phone, if known
    pub phone: Option<String>,
    /// Raw send timestamp in transcript format, if matched
    pub sent_date: Option<String>,
}

/// The total mapping from image basename to enrichment fields.
///
/// Keys are ordered, so serializing the same mapping twice is byte-identical.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactMapping {
    entries: BTreeMap<String, MappedContact>,
}

impl ContactMapping {
    /// Looks up the enrichment entry for an image basename.
    pub fn get(&self, filename: &str) -> Option<&MappedContact> {
        self.entries.get(filename)
    }

    /// Number of entries (one per input filename).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries that actually matched a sender.
    pub fn matched_count(&self) -> usize {
        self.entries.values().filter(|m| m.name.is_some()).count()
    }

    /// Iterates entries in filename order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &MappedContact)> {
        self.entries.iter()
    }

    /// Persists the mapping as pretty JSON (non-ASCII preserved).
    ///
    /// This is a debug/inspection artifact: nothing downstream reads it, and
    /// callers are free to skip it or ignore a write failure.
    pub fn write_debug_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// The run of leading ASCII digits of a filename, if any.
fn leading_digits(name: &str) -> Option<&str> {
    let end = name.find(|c: char| !c.is_ascii_digit()).unwrap_or(name.len());
    if end == 0 { None } else { Some(&name[..end]) }
}

/// Compares two digit runs with leading zeros stripped from both sides.
fn ordinal_eq(a: &str, b: &str) -> bool {
    a.trim_start_matches('0') == b.trim_start_matches('0')
}

fn mapped_from(event: &AttachmentEvent, parse: &TranscriptParse) -> MappedContact {
    MappedContact {
        name: Some(event.sender.clone()),
        phone: parse.sender_phone(&event.sender).map(str::to_string),
        sent_date: Some(event.timestamp.clone()),
    }
}

/// Correlates on-disk image basenames with attachment events.
///
/// Total over the input: the result holds exactly one entry per distinct
/// input filename, all-null when no tier matched.
///
/// # Example
///
/// ```rust
/// use paymatch::correlate::correlate;
/// use paymatch::transcript::TranscriptParser;
///
/// let parse = TranscriptParser::new().parse_str(
///     "[27/04/25, 12:44:30] John Doe: <attached: 00000001-PHOTO-2025-04-27-12-44-28.jpg>",
/// );
/// let mapping = correlate(["00000001-PHOTO-2025-04-27-12-44-28.jpg"], &parse);
/// let entry = mapping.get("00000001-PHOTO-2025-04-27-12-44-28.jpg").unwrap();
/// assert_eq!(entry.name.as_deref(), Some("John Doe"));
/// assert_eq!(entry.sent_date.as_deref(), Some("27/04/25, 12:44:30"));
/// ```
pub fn correlate<I, S>(image_filenames: I, parse: &TranscriptParse) -> ContactMapping
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    // Filename -> event, last occurrence wins; discovery order kept separately
    // for tier-2 iteration.
    let mut by_filename: HashMap<&str, &AttachmentEvent> = HashMap::new();
    let mut discovery_order: Vec<&str> = Vec::new();
    for event in &parse.events {
        if !by_filename.contains_key(event.filename.as_str()) {
            discovery_order.push(&event.filename);
        }
        by_filename.insert(&event.filename, event);
    }

    let mut mapping = ContactMapping::default();

    for filename in image_filenames {
        let filename = filename.as_ref();
        let matched = match_one(filename, parse, &by_filename, &discovery_order);

        match &matched {
            Some((tier, _)) => debug!(filename, tier, "image matched"),
            None => debug!(filename, "image unmatched"),
        }

        let entry = matched.map_or_else(MappedContact::default, |(_, m)| m);
        mapping.entries.insert(filename.to_string(), entry);
    }

    info!(
        total = mapping.len(),
        matched = mapping.matched_count(),
        "image correlation complete"
    );
    mapping
}

/// Runs the tiers for one filename. Returns the tier name for logging.
fn match_one(
    filename: &str,
    parse: &TranscriptParse,
    by_filename: &HashMap<&str, &AttachmentEvent>,
    discovery_order: &[&str],
) -> Option<(&'static str, MappedContact)> {
    // Tier 1: exact filename match.
    if let Some(event) = by_filename.get(filename) {
        return Some(("exact", mapped_from(event, parse)));
    }

    // Tier 2: leading digit run, zeros stripped, event discovery order.
    if let Some(ordinal) = leading_digits(filename) {
        for known in discovery_order {
            if let Some(known_ordinal) = leading_digits(known) {
                if ordinal_eq(ordinal, known_ordinal) {
                    let event = by_filename[known];
                    return Some(("leading-digits", mapped_from(event, parse)));
                }
            }
        }
    }

    // Tier 3: closest embedded date, accepted within one day. First event at
    // the minimum distance wins (strict comparison keeps discovery order).
    let image_date = dates::embedded_date(filename)?;
    let mut closest: Option<(i64, &AttachmentEvent)> = None;
    for event in &parse.events {
        let Some(event_date) = dates::timestamp_date(&event.timestamp) else {
            continue;
        };
        let distance = (image_date - event_date).num_days().abs();
        if closest.is_none_or(|(best, _)| distance < best) {
            closest = Some((distance, event));
        }
    }

    match closest {
        Some((distance, event)) if distance <= 1 => {
            Some(("closest-date", mapped_from(event, parse)))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::TranscriptParser;
    use tempfile::TempDir;

    fn parse(content: &str) -> TranscriptParse {
        TranscriptParser::new().parse_str(content)
    }

    const CHAT: &str = "\
[27/04/25, 12:44:30] John Doe: <attached: 00000001-PHOTO-2025-04-27-12-44-28.jpg>
[28/04/25, 09:10:00] +91 9876543210: <attached: 00000002-PHOTO-2025-04-28-09-09-58.jpg>
";

    #[test]
    fn test_exact_match() {
        let mapping = correlate(["00000001-PHOTO-2025-04-27-12-44-28.jpg"], &parse(CHAT));
        let entry = mapping.get("00000001-PHOTO-2025-04-27-12-44-28.jpg").unwrap();
        assert_eq!(entry.name.as_deref(), Some("John Doe"));
        assert_eq!(entry.phone, None);
        assert_eq!(entry.sent_date.as_deref(), Some("27/04/25, 12:44:30"));
    }

    #[test]
    fn test_leading_digit_match_ignores_decoration() {
        let mapping = correlate(["00000002-receipt.jpg"], &parse(CHAT));
        let entry = mapping.get("00000002-receipt.jpg").unwrap();
        assert_eq!(entry.name.as_deref(), Some("+91 9876543210"));
        assert_eq!(entry.phone.as_deref(), Some("+91 9876543210"));
    }

    #[test]
    fn test_leading_zeros_stripped_both_sides() {
        let mapping = correlate(["2-receipt.jpg"], &parse(CHAT));
        assert_eq!(
            mapping.get("2-receipt.jpg").unwrap().name.as_deref(),
            Some("+91 9876543210")
        );
    }

    #[test]
    fn test_closest_date_within_one_day() {
        // No ordinal, embedded date one day after the only event.
        let mapping = correlate(["scan-2025-04-28.jpg"], &parse(
            "[27/04/25, 12:44:30] John Doe: <attached: 00000001-PHOTO-2025-04-27-12-44-28.jpg>\n",
        ));
        assert_eq!(
            mapping.get("scan-2025-04-28.jpg").unwrap().name.as_deref(),
            Some("John Doe")
        );
    }

    #[test]
    fn test_closest_date_two_days_rejected() {
        let mapping = correlate(["scan-2025-04-29.jpg"], &parse(
            "[27/04/25, 12:44:30] John Doe: <attached: 00000001-PHOTO-2025-04-27-12-44-28.jpg>\n",
        ));
        let entry = mapping.get("scan-2025-04-29.jpg").unwrap();
        assert_eq!(entry, &MappedContact::default());
    }

    #[test]
    fn test_closest_date_tie_break_first_event() {
        let chat = "\
[27/04/25, 10:00:00] John Doe: <attached: 00000001-PHOTO-2025-04-27-10-00-00.jpg>
[29/04/25, 10:00:00] Jane Roe: <attached: 00000003-PHOTO-2025-04-29-10-00-00.jpg>
";
        // 2025-04-28 is exactly one day from both events.
        let mapping = correlate(["scan-2025-04-28.jpg"], &parse(chat));
        assert_eq!(
            mapping.get("scan-2025-04-28.jpg").unwrap().name.as_deref(),
            Some("John Doe")
        );
    }

    #[test]
    fn test_exact_wins_over_closest_date() {
        let chat = "\
[27/04/25, 10:00:00] John Doe: <attached: 00000001-PHOTO-2025-04-27-10-00-00.jpg>
[28/04/25, 10:00:00] Jane Roe: <attached: 99999999-PHOTO-2025-04-28-10-00-00.jpg>
";
        // Filename embeds a date adjacent to Jane's event but matches John's exactly.
        let mapping = correlate(["00000001-PHOTO-2025-04-27-10-00-00.jpg"], &parse(chat));
        assert_eq!(
            mapping
                .get("00000001-PHOTO-2025-04-27-10-00-00.jpg")
                .unwrap()
                .name
                .as_deref(),
            Some("John Doe")
        );
    }

    #[test]
    fn test_mapping_is_total() {
        let names = ["a.jpg", "b.png", "scan-2025-04-28.jpg", "00000002-x.jpg"];
        let mapping = correlate(names, &parse(CHAT));
        assert_eq!(mapping.len(), names.len());
        for name in names {
            assert!(mapping.get(name).is_some());
        }
    }

    #[test]
    fn test_unmatched_entry_all_null() {
        let mapping = correlate(["unrelated.png"], &parse(CHAT));
        assert_eq!(mapping.get("unrelated.png").unwrap(), &MappedContact::default());
        assert_eq!(mapping.matched_count(), 0);
    }

    #[test]
    fn test_duplicate_event_filename_last_wins() {
        let chat = "\
[27/04/25, 10:00:00] John Doe: <attached: 00000001-PHOTO-2025-04-27-10-00-00.jpg>
[28/04/25, 10:00:00] Jane Roe: <attached: 00000001-PHOTO-2025-04-27-10-00-00.jpg>
";
        let mapping = correlate(["00000001-PHOTO-2025-04-27-10-00-00.jpg"], &parse(chat));
        assert_eq!(
            mapping
                .get("00000001-PHOTO-2025-04-27-10-00-00.jpg")
                .unwrap()
                .name
                .as_deref(),
            Some("Jane Roe")
        );
    }

    #[test]
    fn test_rerun_byte_identical_json() {
        let names = ["00000001-PHOTO-2025-04-27-12-44-28.jpg", "stray.png"];
        let p = parse(CHAT);
        let a = serde_json::to_string_pretty(&correlate(names, &p)).unwrap();
        let b = serde_json::to_string_pretty(&correlate(names, &p)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_write_debug_json_preserves_non_ascii() {
        let chat = "[27/04/25, 10:00:00] జాన్: <attached: 00000001-PHOTO-2025-04-27-10-00-00.jpg>\n";
        let mapping = correlate(["00000001-PHOTO-2025-04-27-10-00-00.jpg"], &parse(chat));

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("contact_mapping.json");
        mapping.write_debug_json(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("జాన్"));
        let reread: ContactMapping = serde_json::from_str(&written).unwrap();
        assert_eq!(reread, mapping);
    }

    #[test]
    fn test_leading_digits_helper() {
        assert_eq!(leading_digits("00000002-receipt.jpg"), Some("00000002"));
        assert_eq!(leading_digits("receipt.jpg"), None);
        assert_eq!(leading_digits("123"), Some("123"));
    }

    #[test]
    fn test_ordinal_eq_all_zeros() {
        assert!(ordinal_eq("000", "0"));
        assert!(ordinal_eq("007", "7"));
        assert!(!ordinal_eq("10", "1"));
    }
}
