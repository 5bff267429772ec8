//! Structured-extraction collaborator.
//!
//! Turns OCR free text into the four receipt fields. The pipeline only knows
//! the [`FieldExtractor`] trait; the production implementation posts a prompt
//! to the Groq OpenAI-compatible chat-completions API and parses the JSON it
//! replies with. No field validation happens here — whatever comes back is
//! carried as text.

use serde_json::{Value, json};
use tracing::debug;

use crate::config::ExtractorConfig;
use crate::error::{PaymatchError, Result};
use crate::record::ExtractedPayment;

/// Free text in, receipt fields out.
pub trait FieldExtractor {
    /// Extracts payment fields from OCR text. Any field may come back empty.
    fn extract(&self, text: &str) -> Result<ExtractedPayment>;
}

const PROMPT_TEMPLATE: &str = "\
Extract payment information from the following text that was obtained from a screenshot of a payment receipt.

Text from screenshot:
{ocr_text}

Extract the following information:
1. Transaction ID/Reference Number
2. Date of transaction
3. Amount paid
4. Payment app/method used (e.g., Google Pay, PhonePe, bank transfer, NEFT, Net Banking, RTGS, IMPS)

The response should be valid JSON with these exact keys:
- transaction_id: The transaction ID or reference number
- date: The date of the payment
- amount: The amount paid (numeric value without currency symbol)
- payment_method: The payment app or method used
";

/// [`FieldExtractor`] backed by the Groq chat-completions API.
pub struct GroqExtractor {
    client: reqwest::blocking::Client,
    config: ExtractorConfig,
}

impl GroqExtractor {
    /// Creates an extractor from environment configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PaymatchError::MissingConfig`] when the API key is unset —
    /// the caller should abort the run before processing starts.
    pub fn from_env() -> Result<Self> {
        Ok(Self::with_config(ExtractorConfig::from_env()?))
    }

    /// Creates an extractor with explicit configuration.
    pub fn with_config(config: ExtractorConfig) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            config,
        }
    }
}

impl FieldExtractor for GroqExtractor {
    fn extract(&self, text: &str) -> Result<ExtractedPayment> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let body = json!({
            "model": self.config.model,
            "messages": [{
                "role": "user",
                "content": PROMPT_TEMPLATE.replace("{ocr_text}", text),
            }],
        });

        debug!(url, model = %self.config.model, "requesting field extraction");
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()?;

        if !response.status().is_success() {
            return Err(PaymatchError::extraction(format!(
                "service returned status {}",
                response.status()
            )));
        }

        let reply: Value = response.json()?;
        let content = reply["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| PaymatchError::extraction("reply carried no message content"))?;

        parse_reply(content)
    }
}

/// Parses the model's reply into an [`ExtractedPayment`].
///
/// Models wrap JSON in prose or ```json fences often enough that the parse
/// targets the outermost `{...}` slice rather than the whole reply.
fn parse_reply(content: &str) -> Result<ExtractedPayment> {
    let slice = content
        .find('{')
        .zip(content.rfind('}'))
        .filter(|(start, end)| start <= end)
        .map(|(start, end)| &content[start..=end])
        .ok_or_else(|| PaymatchError::extraction("no JSON object in reply"))?;
    let value: Value = serde_json::from_str(slice)
        .map_err(|e| PaymatchError::extraction(format!("reply is not valid JSON: {e}")))?;

    Ok(ExtractedPayment {
        transaction_id: field_as_text(&value["transaction_id"]),
        date: field_as_text(&value["date"]),
        amount: field_as_text(&value["amount"]),
        payment_method: field_as_text(&value["payment_method"]),
    })
}

/// Normalizes a reply field to text. Numbers become their decimal form;
/// null, missing, and empty values become `None`.
fn field_as_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}
