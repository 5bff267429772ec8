//! Unified error types for paymatch.
//!
//! This module provides a single [`PaymatchError`] enum that covers all error
//! cases in the library.
//!
//! # Error Handling Philosophy
//!
//! - **Library users** get typed errors they can match on
//! - **Application users** get clear, actionable error messages
//! - Failures scoped to one transcript line, one image, or one date are
//!   handled with `Option` and logging inside the pipeline and never reach
//!   this type; only run-level problems do.

use std::io;

use thiserror::Error;

/// A specialized [`Result`] type for paymatch operations.
///
/// # Example
///
/// ```rust
/// use paymatch::error::Result;
///
/// fn my_function() -> Result<()> {
///     // ... operations that may fail
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, PaymatchError>;

/// The error type for all paymatch operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PaymatchError {
    /// An I/O error occurred.
    ///
    /// This typically happens when:
    /// - The export zip or an output path doesn't exist
    /// - Permission denied
    /// - Disk is full (when writing output)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Failed to read or extract the export archive.
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// CSV writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parsing/serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP error while calling the structured-extraction service.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid month filter string.
    ///
    /// Month filters expect `YYYY-MM` format.
    #[error("Invalid month '{input}'. Expected format: {expected}")]
    InvalidMonth {
        /// The invalid month string that was provided
        input: String,
        /// Expected format description
        expected: &'static str,
    },

    /// A required configuration value is missing.
    ///
    /// This is the only error that should abort a run before any image is
    /// processed (e.g. `GROQ_API_KEY` is not set).
    #[error("Missing required configuration: {name}")]
    MissingConfig {
        /// Name of the missing setting / environment variable
        name: &'static str,
    },

    /// The OCR runner failed in a way that is not a per-image "no text".
    #[error("OCR runner failed: {message}")]
    Ocr {
        /// Description of what went wrong
        message: String,
    },

    /// The extraction service returned something unusable.
    #[error("Extraction failed: {message}")]
    Extraction {
        /// Description of what went wrong
        message: String,
    },
}

impl PaymatchError {
    /// Convenience constructor for OCR failures.
    pub fn ocr(message: impl Into<String>) -> Self {
        PaymatchError::Ocr {
            message: message.into(),
        }
    }

    /// Convenience constructor for extraction failures.
    pub fn extraction(message: impl Into<String>) -> Self {
        PaymatchError::Extraction {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PaymatchError::InvalidMonth {
            input: "2025/04".to_string(),
            expected: "YYYY-MM",
        };
        assert_eq!(
            err.to_string(),
            "Invalid month '2025/04'. Expected format: YYYY-MM"
        );
    }

    #[test]
    fn test_missing_config_display() {
        let err = PaymatchError::MissingConfig {
            name: "GROQ_API_KEY",
        };
        assert!(err.to_string().contains("GROQ_API_KEY"));
    }

    #[test]
    fn test_io_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let err: PaymatchError = io_err.into();
        assert!(matches!(err, PaymatchError::Io(_)));
    }
}
