//! Payment record models.
//!
//! [`ExtractedPayment`] is what the structured-extraction collaborator hands
//! back for one receipt; [`PaymentRecord`] is the flat, enriched row the
//! export writes. The core never validates field types or numeric ranges —
//! whatever the extractor said is carried through as text.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::correlate::MappedContact;

/// Fixed preferred column order for the tabular export. Extra fields follow.
pub const COLUMNS: &[&str] = &[
    "contact_name",
    "contact_phone",
    "sent_date",
    "transaction_id",
    "amount",
    "payment_method",
    "date",
    "image_file",
];

/// Fields the structured-extraction collaborator returns for one receipt.
/// Any of them may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedPayment {
    /// Transaction ID / reference number
    pub transaction_id: Option<String>,
    /// Date of the payment, as printed on the receipt
    pub date: Option<String>,
    /// Amount paid, without currency symbol
    pub amount: Option<String>,
    /// Payment app or method (Google Pay, NEFT, ...)
    pub payment_method: Option<String>,
}

/// One enriched payment row: extraction output plus the chat-side contact
/// fields contributed by the correlator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    /// Send timestamp, display-formatted when it parsed, raw otherwise
    pub sent_date: Option<String>,
    pub transaction_id: Option<String>,
    pub amount: Option<String>,
    pub payment_method: Option<String>,
    pub date: Option<String>,
    /// Source image path
    pub image_file: String,
    /// Anything else the extractor returned, exported after the fixed columns
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl PaymentRecord {
    /// Builds a record from one extraction result.
    pub fn new(image_file: impl Into<String>, payment: ExtractedPayment) -> Self {
        Self {
            image_file: image_file.into(),
            transaction_id: payment.transaction_id,
            date: payment.date,
            amount: payment.amount,
            payment_method: payment.payment_method,
            ..Self::default()
        }
    }

    /// Applies the correlator's enrichment fields.
    ///
    /// An unmatched (all-null) entry applies cleanly and leaves the contact
    /// columns empty — callers never need an existence check. When a contact
    /// has no name, the phone stands in for it.
    pub fn apply_contact(&mut self, contact: &MappedContact) {
        self.contact_name = contact.name.clone().or_else(|| contact.phone.clone());
        self.contact_phone = contact.phone.clone();
        self.sent_date = contact.sent_date.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_carries_extraction_fields() {
        let record = PaymentRecord::new(
            "r.jpg",
            ExtractedPayment {
                transaction_id: Some("TXN123".into()),
                date: Some("27 Apr 2025".into()),
                amount: Some("1500".into()),
                payment_method: Some("Google Pay".into()),
            },
        );
        assert_eq!(record.image_file, "r.jpg");
        assert_eq!(record.transaction_id.as_deref(), Some("TXN123"));
        assert_eq!(record.contact_name, None);
    }

    #[test]
    fn test_apply_contact() {
        let mut record = PaymentRecord::new("r.jpg", ExtractedPayment::default());
        record.apply_contact(&MappedContact {
            name: Some("John Doe".into()),
            phone: Some("9876543210".into()),
            sent_date: Some("27/04/25, 12:44:30".into()),
        });
        assert_eq!(record.contact_name.as_deref(), Some("John Doe"));
        assert_eq!(record.contact_phone.as_deref(), Some("9876543210"));
        assert_eq!(record.sent_date.as_deref(), Some("27/04/25, 12:44:30"));
    }

    #[test]
    fn test_apply_contact_phone_stands_in_for_name() {
        let mut record = PaymentRecord::new("r.jpg", ExtractedPayment::default());
        record.apply_contact(&MappedContact {
            name: None,
            phone: Some("9876543210".into()),
            sent_date: None,
        });
        assert_eq!(record.contact_name.as_deref(), Some("9876543210"));
    }

    #[test]
    fn test_apply_unmatched_contact_is_noop() {
        let mut record = PaymentRecord::new("r.jpg", ExtractedPayment::default());
        record.apply_contact(&MappedContact::default());
        assert_eq!(record.contact_name, None);
        assert_eq!(record.sent_date, None);
    }
}
