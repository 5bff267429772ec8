//! # paymatch CLI
//!
//! Command-line interface for the paymatch library.

use std::process;

use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;

use paymatch::cli::{Args, OutputFormat};
use paymatch::config::{OcrConfig, PipelineConfig};
use paymatch::error::Result;
use paymatch::export;
use paymatch::extract::GroqExtractor;
use paymatch::filter::Month;
use paymatch::ocr::LlamaOcr;
use paymatch::pipeline::PaymentProcessor;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = <Args as ClapParser>::parse();

    let month = match &args.month {
        Some(raw) => raw.parse::<Month>()?,
        None => Month::current(),
    };

    println!("📦 paymatch v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Export:  {}", args.input.display());
    println!("📅 Month:   {}", month);
    println!("💾 Output:  {}", args.output.display());
    println!("📄 Format:  {}", args.format);
    println!();

    // Fatal configuration problems surface here, before any image work.
    let extractor = GroqExtractor::from_env()?;
    let ocr = LlamaOcr::with_config(OcrConfig::new().with_script(args.ocr_script.clone()));

    let pipeline_config = PipelineConfig::new()
        .with_work_dir(args.work_dir.clone())
        .with_keep_work_dir(args.keep_temp)
        .with_mapping_json(!args.no_mapping_json);

    println!("⏳ Processing export...");
    let processor = PaymentProcessor::with_config(ocr, extractor, pipeline_config);
    let summary = processor.process(&args.input, &month)?;

    println!("💾 Writing {}...", args.format);
    match args.format {
        OutputFormat::Csv => export::write_csv(&summary.records, &args.output)?,
        OutputFormat::Json => export::write_json(&summary.records, &args.output)?,
    }

    println!();
    println!("✅ Done! Output saved to {}", args.output.display());
    println!();
    println!("📊 Summary:");
    println!("   Images found:     {}", summary.images_found);
    println!("   In target month:  {}", summary.images_selected);
    println!("   Payment records:  {}", summary.records.len());
    if summary.dropped > 0 {
        println!("   Dropped:          {}", summary.dropped);
    }
    if args.keep_temp {
        println!();
        println!("📁 Work directory kept at: {}", args.work_dir.display());
    }

    Ok(())
}
