//! WhatsApp transcript parser.
//!
//! Consumes the `_chat.txt` file from a WhatsApp export and produces the two
//! things the correlator needs: a table of sender contacts and an ordered
//! sequence of attachment events (who sent which image file, and when).
//!
//! The export writes one message per line:
//!
//! ```text
//! [27/04/25, 12:44:30] John Doe: <attached: 00000001-PHOTO-2025-04-27-12-44-28.jpg>
//! ```
//!
//! Lines that don't match this shape — system notices, continuations of
//! multi-line messages — are skipped. An attachment marker sitting on a
//! continuation line is therefore lost; the export's multi-line convention is
//! unconfirmed, so no stitching is attempted.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, info};

use crate::phone::extract_phone;

/// Message line: `[DD/MM/YY, HH:MM:SS] Sender: body`.
///
/// The sender capture is non-greedy so it stops at the first `: ` rather than
/// swallowing colons inside the body. Exports prefix some lines with a
/// left-to-right mark, hence the leading character class.
static LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\u{200e}\u{200f}\u{feff}\s]*\[(\d{2}/\d{2}/\d{2},\s\d{2}:\d{2}:\d{2})\]\s(.+?):\s(.+)$")
        .expect("invalid regex")
});

/// Attachment marker carrying the export's fixed photo filename convention:
/// 8-digit ordinal, `PHOTO`, then the send date and time.
static ATTACHMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<attached:\s*(\d{8}-PHOTO-\d{4}-\d{2}-\d{2}-\d{2}-\d{2}-\d{2}\.jpg)>")
        .expect("invalid regex")
});

/// One attachment reference extracted from a transcript line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentEvent {
    /// Raw timestamp in source format, e.g. `27/04/25, 12:44:30`
    pub timestamp: String,
    /// Sender label exactly as exported
    pub sender: String,
    /// Attachment filename from the marker
    pub filename: String,
}

/// A sender identity with an optional best-effort phone number.
///
/// Registered the first time a sender label is seen; the first registration's
/// phone wins and is never overwritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contact {
    /// Sender label (unique key)
    pub name: String,
    /// Best-effort phone number, if one could be derived
    pub phone: Option<String>,
}

/// The result of one parse pass: contact table plus ordered attachment events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranscriptParse {
    /// Contacts keyed by sender label
    pub contacts: HashMap<String, Contact>,
    /// Attachment events in transcript line order
    pub events: Vec<AttachmentEvent>,
}

impl TranscriptParse {
    /// Looks up the phone registered for a sender, if any.
    pub fn sender_phone(&self, name: &str) -> Option<&str> {
        self.contacts.get(name).and_then(|c| c.phone.as_deref())
    }
}

/// Parser for the WhatsApp `_chat.txt` transcript.
///
/// Owns no state between runs; each call builds a fresh [`TranscriptParse`].
///
/// # Example
///
/// ```rust
/// use paymatch::transcript::TranscriptParser;
///
/// let parser = TranscriptParser::new();
/// let parse = parser.parse_str(
///     "[27/04/25, 12:44:30] John Doe: <attached: 00000001-PHOTO-2025-04-27-12-44-28.jpg>",
/// );
/// assert_eq!(parse.events.len(), 1);
/// assert_eq!(parse.events[0].sender, "John Doe");
/// ```
#[derive(Debug, Default)]
pub struct TranscriptParser;

impl TranscriptParser {
    /// Creates a new parser.
    pub fn new() -> Self {
        Self
    }

    /// Parses a transcript file.
    ///
    /// A missing or unreadable file is a valid, reportable outcome — it
    /// yields an empty parse, never an error. Malformed UTF-8 is tolerated
    /// (replaced, not rejected).
    pub fn parse_file(&self, path: &Path) -> TranscriptParse {
        match fs::read(path) {
            Ok(bytes) => self.parse_str(&String::from_utf8_lossy(&bytes)),
            Err(e) => {
                info!(path = %path.display(), error = %e, "transcript not readable, continuing with empty parse");
                TranscriptParse::default()
            }
        }
    }

    /// Parses transcript content from a string.
    pub fn parse_str(&self, content: &str) -> TranscriptParse {
        let mut parse = TranscriptParse::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let Some(caps) = LINE_RE.captures(line) else {
                // Continuation or system line. No state is carried over.
                debug!(line, "skipping non-message line");
                continue;
            };

            let timestamp = caps.get(1).map_or("", |m| m.as_str());
            let sender = caps.get(2).map_or("", |m| m.as_str()).trim();
            let body = caps.get(3).map_or("", |m| m.as_str());

            parse
                .contacts
                .entry(sender.to_string())
                .or_insert_with(|| Contact {
                    name: sender.to_string(),
                    phone: extract_phone(sender, body),
                });

            if let Some(att) = ATTACHMENT_RE.captures(body) {
                let filename = att.get(1).map_or("", |m| m.as_str());
                debug!(filename, sender, timestamp, "found attachment event");
                parse.events.push(AttachmentEvent {
                    timestamp: timestamp.to_string(),
                    sender: sender.to_string(),
                    filename: filename.to_string(),
                });
            }
        }

        info!(
            contacts = parse.contacts.len(),
            events = parse.events.len(),
            "transcript parsed"
        );
        parse
    }
}
