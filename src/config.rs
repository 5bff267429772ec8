//! Configuration types for the collaborators and the pipeline.
//!
//! # Example
//!
//! ```rust
//! use paymatch::config::{OcrConfig, PipelineConfig};
//!
//! let ocr = OcrConfig::new().with_node_binary("nodejs");
//! let pipeline = PipelineConfig::new().with_keep_work_dir(true);
//! ```

use std::env;
use std::path::PathBuf;

use crate::error::{PaymatchError, Result};

/// Environment variable holding the extraction service credential.
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

/// Configuration for the Node llama-ocr runner.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Node.js binary (default: `node`)
    pub node_binary: String,
    /// Path to the OCR runner script (default: `ocr_runner.mjs`)
    pub script: PathBuf,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            node_binary: "node".to_string(),
            script: PathBuf::from("ocr_runner.mjs"),
        }
    }
}

impl OcrConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the Node.js binary name or path.
    #[must_use]
    pub fn with_node_binary(mut self, binary: impl Into<String>) -> Self {
        self.node_binary = binary.into();
        self
    }

    /// Sets the OCR runner script path.
    #[must_use]
    pub fn with_script(mut self, script: impl Into<PathBuf>) -> Self {
        self.script = script.into();
        self
    }
}

/// Configuration for the hosted structured-extraction service.
///
/// The API key is required and is the one thing that can abort a run before
/// any image is processed.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Bearer token for the service
    pub api_key: String,
    /// Model identifier (default: `llama3-70b-8192`)
    pub model: String,
    /// Base URL of the OpenAI-compatible API
    pub base_url: String,
}

impl ExtractorConfig {
    /// Builds the configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`PaymatchError::MissingConfig`] when `GROQ_API_KEY` is unset
    /// or empty.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or(PaymatchError::MissingConfig { name: API_KEY_ENV })?;
        Ok(Self::with_api_key(api_key))
    }

    /// Builds a configuration with an explicit key and default endpoint.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: "llama3-70b-8192".to_string(),
            base_url: "https://api.groq.com/openai/v1".to_string(),
        }
    }

    /// Sets the model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Configuration for a processing run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory the export zip is extracted into
    pub work_dir: PathBuf,
    /// Keep the work directory after the run (default: false)
    pub keep_work_dir: bool,
    /// Write the contact-mapping debug JSON into the work directory
    /// (default: true; a write failure never fails the run)
    pub write_mapping_json: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("temp_screenshots"),
            keep_work_dir: false,
            write_mapping_json: true,
        }
    }
}

impl PipelineConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the extraction work directory.
    #[must_use]
    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }

    /// Keeps or removes the work directory after the run.
    #[must_use]
    pub fn with_keep_work_dir(mut self, keep: bool) -> Self {
        self.keep_work_dir = keep;
        self
    }

    /// Enables or disables the mapping debug artifact.
    #[must_use]
    pub fn with_mapping_json(mut self, write: bool) -> Self {
        self.write_mapping_json = write;
        self
    }
}
