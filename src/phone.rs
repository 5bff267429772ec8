//! Best-effort phone number extraction.
//!
//! WhatsApp exports name a sender either by address-book label ("John Doe")
//! or by phone identity ("+91 9876543210"). When the label carries no number,
//! the message body is scanned for one. This is enrichment, not ground truth:
//! a bare 10-digit run in a message can just as well be an amount or an
//! account number.

use std::sync::LazyLock;

use regex::Regex;

/// Sender label that *is* a phone identity: `+<digits> <digits>`.
static SENDER_PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+\d+\s\d+$").expect("invalid regex"));

/// International-prefixed 10-digit number, or a bare 10-digit run.
static BODY_PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\+\d{1,3}\s?\d{10}|\d{10})").expect("invalid regex"));

/// Extracts a phone number from a sender label or, failing that, from the
/// message body.
///
/// Rules, in order:
/// 1. A sender label shaped like `+<country> <subscriber>` is returned
///    verbatim.
/// 2. Otherwise the first international-prefixed or bare 10-digit number in
///    the body is returned.
/// 3. No match yields `None`.
///
/// # Example
///
/// ```rust
/// use paymatch::phone::extract_phone;
///
/// assert_eq!(
///     extract_phone("+91 9876543210", "paid"),
///     Some("+91 9876543210".to_string())
/// );
/// assert_eq!(
///     extract_phone("John Doe", "paid via 9876543210"),
///     Some("9876543210".to_string())
/// );
/// assert_eq!(extract_phone("John Doe", "paid, thanks"), None);
/// ```
pub fn extract_phone(sender: &str, body: &str) -> Option<String> {
    if SENDER_PHONE_RE.is_match(sender) {
        return Some(sender.to_string());
    }

    BODY_PHONE_RE
        .find(body)
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_label_is_phone() {
        assert_eq!(
            extract_phone("+91 9876543210", "anything"),
            Some("+91 9876543210".to_string())
        );
    }

    #[test]
    fn test_sender_label_without_space_not_matched() {
        // Rule 1 requires the exported "+CC NNNN" shape.
        assert_eq!(extract_phone("+919876543210", "hello"), None);
    }

    #[test]
    fn test_body_bare_ten_digits() {
        assert_eq!(
            extract_phone("John Doe", "paid via 9876543210"),
            Some("9876543210".to_string())
        );
    }

    #[test]
    fn test_body_international_prefix() {
        assert_eq!(
            extract_phone("John Doe", "reach me at +91 9876543210"),
            Some("+91 9876543210".to_string())
        );
    }

    #[test]
    fn test_no_match() {
        assert_eq!(extract_phone("John Doe", "paid maintenance for April"), None);
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(
            extract_phone("John Doe", "old 1111111111 new 2222222222"),
            Some("1111111111".to_string())
        );
    }
}
