//! Record sources and result sinks
//!
//! Records are read from CSV (header row) or JSON Lines files; scored
//! results are written back in either format. The format follows the file
//! extension.

pub mod sink;
pub mod source;

pub use sink::{read_results, write_results};
pub use source::load_records;

use crate::domain::{PiiFlagError, Result};
use std::fmt;
use std::path::Path;

/// Supported tabular file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Jsonl,
}

impl FileFormat {
    /// Format of an input file; unknown extensions are rejected
    pub fn for_input(path: &Path) -> Result<Self> {
        match extension(path).as_deref() {
            Some("csv") => Ok(FileFormat::Csv),
            Some("jsonl") | Some("ndjson") => Ok(FileFormat::Jsonl),
            Some(ext @ ("xlsx" | "xls" | "ods")) => Err(PiiFlagError::Input(format!(
                "Spreadsheet input '.{ext}' is not read directly ({}). \
                 Export the sheet to .csv or .jsonl first",
                path.display()
            ))),
            other => Err(PiiFlagError::Input(format!(
                "Unsupported input format '{}' for {}. Supported formats: .csv, .jsonl",
                other.unwrap_or(""),
                path.display()
            ))),
        }
    }

    /// Format of an output file; anything but JSON Lines is written as CSV
    pub fn for_output(path: &Path) -> Self {
        match extension(path).as_deref() {
            Some("jsonl") | Some("ndjson") => FileFormat::Jsonl,
            _ => FileFormat::Csv,
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFormat::Csv => f.write_str("csv"),
            FileFormat::Jsonl => f.write_str("jsonl"),
        }
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}
