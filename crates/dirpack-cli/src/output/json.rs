//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use dirpack_core::ArchiveReport;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct CreationOutput {
    output_path: String,
    files_added: usize,
    bytes_read: u64,
    archive_size: u64,
    compression_ratio: f64,
    compression_percentage: f64,
    duration_ms: u128,
    warnings: Vec<String>,
}

impl CreationOutput {
    fn new(destination: &Path, report: &ArchiveReport) -> Self {
        Self {
            output_path: destination.display().to_string(),
            files_added: report.files_added,
            bytes_read: report.bytes_read,
            archive_size: report.archive_size,
            compression_ratio: report.compression_ratio(),
            compression_percentage: report.compression_percentage(),
            duration_ms: report.duration.as_millis(),
            warnings: report.warnings.clone(),
        }
    }
}

impl OutputFormatter for JsonFormatter {
    // The result document is the only output in JSON mode.
    fn format_start(&self, _destination: &Path) {}

    fn format_entry(&self, _name: &str) {}

    fn format_archive_result(&self, destination: &Path, report: &ArchiveReport) -> Result<()> {
        let output = JsonOutput::success("create", CreationOutput::new(destination, report));
        Self::output(&output)
    }

    fn format_error(&self, operation: &str, error: &anyhow::Error) {
        let output = JsonOutput::error(operation, format!("{error:#}"));
        let _ = Self::output(&output);
    }
}
