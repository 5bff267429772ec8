//! # Paymatch
//!
//! Reconciles two independently-produced records of the same event — a
//! maintenance fee being paid — by correlating a WhatsApp chat export (who
//! sent which receipt screenshot, and when) with the text OCR'd out of those
//! screenshots, producing one structured row per payment.
//!
//! ## Overview
//!
//! The interesting part is the correlation: an attachment filename seen in
//! the transcript rarely matches the file on disk exactly, so the
//! [`correlate`] module applies three fallback tiers (exact name, leading
//! numeric ordinal, closest embedded date). Everything around it — zip
//! extraction, OCR, hosted field extraction, spreadsheet writing — is a thin
//! wrapper over an external tool or service behind a narrow seam.
//!
//! ## Quick Start
//!
//! ```rust
//! use paymatch::prelude::*;
//!
//! let parser = TranscriptParser::new();
//! let parse = parser.parse_str(
//!     "[27/04/25, 12:44:30] John Doe: <attached: 00000001-PHOTO-2025-04-27-12-44-28.jpg>",
//! );
//!
//! let mapping = correlate(["00000001-PHOTO-2025-04-27-12-44-28.jpg"], &parse);
//! let entry = mapping.get("00000001-PHOTO-2025-04-27-12-44-28.jpg").unwrap();
//! assert_eq!(entry.name.as_deref(), Some("John Doe"));
//! ```
//!
//! ## Module Structure
//!
//! - [`transcript`] — WhatsApp transcript parser
//!   ([`TranscriptParser`](transcript::TranscriptParser),
//!   [`AttachmentEvent`](transcript::AttachmentEvent),
//!   [`Contact`](transcript::Contact))
//! - [`phone`] — best-effort phone extraction
//! - [`correlate`] — three-tier image-to-contact correlation
//!   ([`ContactMapping`](correlate::ContactMapping))
//! - [`filter`] — month selection ([`Month`](filter::Month),
//!   [`filter_by_month`](filter::filter_by_month))
//! - [`dates`] — explicit ordered date-format tables
//! - [`archive`], [`ocr`], [`extract`], [`export`] — external collaborators
//! - [`pipeline`] — run orchestration
//!   ([`PaymentProcessor`](pipeline::PaymentProcessor))
//! - [`record`] — [`PaymentRecord`](record::PaymentRecord) and the export
//!   column order
//! - [`error`] — unified error types ([`PaymatchError`], [`Result`])

pub mod archive;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod correlate;
pub mod dates;
pub mod error;
pub mod export;
pub mod extract;
pub mod filter;
pub mod ocr;
pub mod phone;
pub mod pipeline;
pub mod record;
pub mod transcript;

// Re-export the main types at the crate root for convenience
pub use error::{PaymatchError, Result};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use paymatch::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{ExtractorConfig, OcrConfig, PipelineConfig};
    pub use crate::correlate::{ContactMapping, MappedContact, correlate};
    pub use crate::error::{PaymatchError, Result};
    pub use crate::extract::{FieldExtractor, GroqExtractor};
    pub use crate::filter::{Month, filter_by_month};
    pub use crate::ocr::{LlamaOcr, OcrEngine};
    pub use crate::phone::extract_phone;
    pub use crate::pipeline::{PaymentProcessor, RunSummary};
    pub use crate::record::{ExtractedPayment, PaymentRecord};
    pub use crate::transcript::{AttachmentEvent, Contact, TranscriptParse, TranscriptParser};
}
