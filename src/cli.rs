//! Command-line interface definition using clap.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Reconcile a WhatsApp chat export with OCR'd payment receipts
/// into one structured row per payment.
#[derive(Parser, Debug, Clone)]
#[command(name = "paymatch")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    paymatch export.zip
    paymatch export.zip --month 2025-04
    paymatch export.zip -o april_dues.csv --keep-temp
    paymatch export.zip --format json --month 2025-04")]
pub struct Args {
    /// Path to the WhatsApp chat export zip
    pub input: PathBuf,

    /// Month to process, YYYY-MM (default: current month)
    #[arg(short, long, value_name = "YYYY-MM")]
    pub month: Option<String>,

    /// Path to the output file
    #[arg(short, long, default_value = "maintenance_payments.csv")]
    pub output: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    pub format: OutputFormat,

    /// Directory the export is extracted into
    #[arg(long, value_name = "DIR", default_value = "temp_screenshots")]
    pub work_dir: PathBuf,

    /// Keep the extraction directory after the run
    #[arg(long)]
    pub keep_temp: bool,

    /// Skip writing the contact-mapping debug JSON
    #[arg(long)]
    pub no_mapping_json: bool,

    /// OCR runner script path
    #[arg(long, value_name = "SCRIPT", default_value = "ocr_runner.mjs")]
    pub ocr_script: PathBuf,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default)]
pub enum OutputFormat {
    /// Comma-separated values (default)
    #[default]
    Csv,

    /// Pretty-printed JSON array
    Json,
}

impl OutputFormat {
    /// Returns the file extension for this format (without dot).
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Csv => write!(f, "CSV"),
            OutputFormat::Json => write!(f, "JSON"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_extension() {
        assert_eq!(OutputFormat::Csv.extension(), "csv");
        assert_eq!(OutputFormat::Json.extension(), "json");
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["paymatch", "export.zip"]);
        assert_eq!(args.format, OutputFormat::Csv);
        assert_eq!(args.output, PathBuf::from("maintenance_payments.csv"));
        assert!(!args.keep_temp);
        assert_eq!(args.month, None);
    }

    #[test]
    fn test_args_month_and_format() {
        let args =
            Args::parse_from(["paymatch", "export.zip", "--month", "2025-04", "-f", "json"]);
        assert_eq!(args.month.as_deref(), Some("2025-04"));
        assert_eq!(args.format, OutputFormat::Json);
    }
}
