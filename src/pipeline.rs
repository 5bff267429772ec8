//! Run orchestration.
//!
//! Wires the collaborators together for one processing run: extract the
//! export archive, parse the transcript, correlate images with senders,
//! select the target month, then OCR and field-extract each image and enrich
//! the result from the contact mapping.
//!
//! One bad image never aborts the batch: its record is dropped, the drop is
//! counted, and the run continues. The only failure that stops a run before
//! it starts is missing collaborator configuration, which the caller hits
//! when constructing the extractor.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::archive;
use crate::config::PipelineConfig;
use crate::correlate::{ContactMapping, correlate};
use crate::dates;
use crate::error::Result;
use crate::extract::FieldExtractor;
use crate::filter::{Month, filter_by_month};
use crate::ocr::OcrEngine;
use crate::record::PaymentRecord;
use crate::transcript::{TranscriptParse, TranscriptParser};

/// Filename of the mapping debug artifact written into the work directory.
pub const MAPPING_DEBUG_FILE: &str = "contact_mapping.json";

/// What one run produced.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Images discovered in the export
    pub images_found: usize,
    /// Images selected by the month filter
    pub images_selected: usize,
    /// Images whose OCR or extraction failed (their records were dropped)
    pub dropped: usize,
    /// The enriched payment records, in image order
    pub records: Vec<PaymentRecord>,
}

/// The processing pipeline, generic over its two external collaborators.
pub struct PaymentProcessor<O, E> {
    ocr: O,
    extractor: E,
    config: PipelineConfig,
}

impl<O: OcrEngine, E: FieldExtractor> PaymentProcessor<O, E> {
    /// Creates a processor with default pipeline configuration.
    pub fn new(ocr: O, extractor: E) -> Self {
        Self::with_config(ocr, extractor, PipelineConfig::default())
    }

    /// Creates a processor with custom pipeline configuration.
    pub fn with_config(ocr: O, extractor: E, config: PipelineConfig) -> Self {
        Self {
            ocr,
            extractor,
            config,
        }
    }

    /// Runs the full pipeline over one export zip.
    pub fn process(&self, zip_path: &Path, month: &Month) -> Result<RunSummary> {
        let work_dir = &self.config.work_dir;
        archive::extract_archive(zip_path, work_dir)?;

        let result = self.process_extracted(work_dir, month);

        if !self.config.keep_work_dir {
            if let Err(e) = fs::remove_dir_all(work_dir) {
                warn!(dir = %work_dir.display(), error = %e, "could not remove work directory");
            }
        }

        result
    }

    /// Runs the pipeline over an already-extracted export directory.
    pub fn process_extracted(&self, dir: &Path, month: &Month) -> Result<RunSummary> {
        let parse = self.parse_transcript(dir);
        let images = archive::find_images(dir);

        let basenames: Vec<String> = images
            .iter()
            .map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .map(Option::unwrap_or_default)
            .collect();
        let mapping = correlate(&basenames, &parse);

        if self.config.write_mapping_json {
            let path = dir.join(MAPPING_DEBUG_FILE);
            // Debug artifact only; a write failure never fails the run.
            if let Err(e) = mapping.write_debug_json(&path) {
                warn!(path = %path.display(), error = %e, "could not write mapping artifact");
            }
        }

        let selected = filter_by_month(&images, month);
        info!(
            found = images.len(),
            selected = selected.len(),
            month = %month,
            "processing selected images"
        );

        let mut summary = RunSummary {
            images_found: images.len(),
            images_selected: selected.len(),
            ..RunSummary::default()
        };

        for image in &selected {
            match self.process_image(image, &mapping) {
                Ok(Some(record)) => summary.records.push(record),
                Ok(None) => {
                    info!(image = %image.display(), "no text extracted, record dropped");
                    summary.dropped += 1;
                }
                Err(e) => {
                    warn!(image = %image.display(), error = %e, "image failed, record dropped");
                    summary.dropped += 1;
                }
            }
        }

        info!(
            records = summary.records.len(),
            dropped = summary.dropped,
            "run complete"
        );
        Ok(summary)
    }

    fn parse_transcript(&self, dir: &Path) -> TranscriptParse {
        match archive::find_chat_file(dir) {
            Some(chat_file) => TranscriptParser::new().parse_file(&chat_file),
            None => {
                info!(dir = %dir.display(), "no chat transcript in export, images will be unenriched");
                TranscriptParse::default()
            }
        }
    }

    /// Processes one image end to end. `Ok(None)` means the OCR step found
    /// no text; errors are per-image and isolated by the caller.
    fn process_image(&self, image: &Path, mapping: &ContactMapping) -> Result<Option<PaymentRecord>> {
        let Some(text) = self.ocr.extract_text(image)? else {
            return Ok(None);
        };

        let payment = self.extractor.extract(&text)?;
        let mut record = PaymentRecord::new(image.to_string_lossy(), payment);

        let basename = image
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if let Some(contact) = mapping.get(&basename) {
            record.apply_contact(contact);
        }

        // Display-format the send timestamp; keep the raw value when it
        // doesn't parse.
        if let Some(raw) = record.sent_date.take() {
            record.sent_date = Some(dates::format_sent_date(&raw).unwrap_or(raw));
        }

        // Receipt carried no date: fall back to the filename's PHOTO date.
        if record.date.is_none() {
            record.date = dates::date_from_filename(&basename);
        }

        Ok(Some(record))
    }
}
