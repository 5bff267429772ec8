//! OCR collaborator.
//!
//! The pipeline hands an image path to an [`OcrEngine`] and gets back either
//! extracted free text or a definitive "no text" signal. That is the whole
//! contract — what the engine does internally is opaque.
//!
//! The production engine shells out to the Node `llama-ocr` runner script,
//! which writes its markdown output to a file this module reads back.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, warn};

use crate::config::OcrConfig;
use crate::error::{PaymatchError, Result};

/// Text extraction from a receipt screenshot.
///
/// `Ok(None)` is the definitive "no text in this image" outcome; `Err` means
/// the engine itself failed. The pipeline treats both as a dropped record,
/// never as a fatal condition.
pub trait OcrEngine {
    /// Extracts free text from the image at `image`.
    fn extract_text(&self, image: &Path) -> Result<Option<String>>;
}

/// [`OcrEngine`] backed by the Node `llama-ocr` runner.
pub struct LlamaOcr {
    config: OcrConfig,
}

impl LlamaOcr {
    /// Creates an engine with default configuration.
    pub fn new() -> Self {
        Self {
            config: OcrConfig::default(),
        }
    }

    /// Creates an engine with custom configuration.
    pub fn with_config(config: OcrConfig) -> Self {
        Self { config }
    }

    fn output_path_for(image: &Path) -> PathBuf {
        let stem = image
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        env::temp_dir().join(format!("paymatch_ocr_{stem}.md"))
    }
}

impl Default for LlamaOcr {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrEngine for LlamaOcr {
    fn extract_text(&self, image: &Path) -> Result<Option<String>> {
        let output_path = Self::output_path_for(image);
        debug!(image = %image.display(), "running OCR");

        let run = Command::new(&self.config.node_binary)
            .arg(&self.config.script)
            .arg(image)
            .arg(&output_path)
            .output();

        let result = match run {
            Ok(output) if output.status.success() => {
                if output_path.exists() {
                    let text = fs::read_to_string(&output_path)?;
                    if text.trim().is_empty() {
                        Ok(None)
                    } else {
                        Ok(Some(text))
                    }
                } else {
                    // Runner exited cleanly but produced nothing readable.
                    Ok(None)
                }
            }
            Ok(output) => Err(PaymatchError::ocr(format!(
                "runner exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ))),
            Err(e) => Err(PaymatchError::ocr(format!(
                "failed to launch '{}': {e}",
                self.config.node_binary
            ))),
        };

        if output_path.exists() {
            if let Err(e) = fs::remove_file(&output_path) {
                warn!(path = %output_path.display(), error = %e, "could not remove OCR scratch file");
            }
        }

        result
    }
}
