use crate::models::UserLicenseRecord;
use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

/// Failures the exporter raises itself, as opposed to I/O errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot derive CSV headers from an empty report")]
    EmptyReport,
}

/// Export the report to a file and print a confirmation line
///
/// Writes the whole report in one pass; a failure partway through leaves a
/// partial file at the destination.
pub fn export_report(
    records: &[UserLicenseRecord],
    format: ExportFormat,
    path: &Path,
) -> Result<String> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    match format {
        ExportFormat::Csv => export_to_csv(records, path)?,
        ExportFormat::Json => export_to_json(records, path)?,
    }

    println!("Report saved to {}", path.display());
    Ok(path.to_string_lossy().to_string())
}

fn export_to_csv(records: &[UserLicenseRecord], path: &Path) -> Result<()> {
    // Headers come from the first record's key order, so an empty report has
    // nothing to write.
    if records.is_empty() {
        return Err(ExportError::EmptyReport.into());
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file at {}", path.display()))?;

    for record in records {
        writer
            .serialize(record)
            .context("Failed to write CSV record")?;
    }

    writer.flush().context("Failed to flush CSV output")?;
    Ok(())
}

fn export_to_json(records: &[UserLicenseRecord], path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create JSON file at {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    // 4-space indent, not serde_json's 2-space default
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    records
        .serialize(&mut serializer)
        .context("Failed to serialize report to JSON")?;

    writer.flush()?;
    Ok(())
}
