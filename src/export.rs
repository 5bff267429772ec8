//! Tabular export writers.
//!
//! Writes the enriched payment records as CSV or JSON. Columns follow the
//! fixed preferred order ([`COLUMNS`]); any extra fields the extractor
//! returned come after, in sorted order. An empty run still produces a
//! header-only file.

use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::record::{COLUMNS, PaymentRecord};

/// Writes records to a CSV file.
///
/// # Format
/// - Delimiter: `,`
/// - Columns: [`COLUMNS`], then extra fields sorted by name
/// - Encoding: UTF-8
pub fn write_csv(records: &[PaymentRecord], output_path: &Path) -> Result<()> {
    let file = File::create(output_path)?;
    let mut writer = csv::Writer::from_writer(file);

    let extra_columns = collect_extra_columns(records);

    let mut header: Vec<&str> = COLUMNS.to_vec();
    header.extend(extra_columns.iter().map(String::as_str));
    writer.write_record(&header)?;

    for record in records {
        writer.write_record(build_row(record, &extra_columns))?;
    }

    writer.flush()?;
    info!(records = records.len(), path = %output_path.display(), "CSV written");
    Ok(())
}

/// Writes records to a pretty-printed JSON array.
pub fn write_json(records: &[PaymentRecord], output_path: &Path) -> Result<()> {
    let file = File::create(output_path)?;
    serde_json::to_writer_pretty(file, records)?;
    info!(records = records.len(), path = %output_path.display(), "JSON written");
    Ok(())
}

/// Union of extra field names across all records, sorted.
fn collect_extra_columns(records: &[PaymentRecord]) -> Vec<String> {
    let names: BTreeSet<&String> = records.iter().flat_map(|r| r.extra.keys()).collect();
    names.into_iter().cloned().collect()
}

fn build_row(record: &PaymentRecord, extra_columns: &[String]) -> Vec<String> {
    let fixed = [
        record.contact_name.clone(),
        record.contact_phone.clone(),
        record.sent_date.clone(),
        record.transaction_id.clone(),
        record.amount.clone(),
        record.payment_method.clone(),
        record.date.clone(),
        Some(record.image_file.clone()),
    ];

    let mut row: Vec<String> = fixed
        .into_iter()
        .map(|field| field.unwrap_or_default())
        .collect();

    for name in extra_columns {
        row.push(record.extra.get(name).cloned().unwrap_or_default());
    }

    row
}
