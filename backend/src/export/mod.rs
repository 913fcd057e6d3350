//! Cleaned CSV export.
//!
//! The output mirrors what spreadsheet tools expect from the ledger import
//! screen: a UTF-8 byte-order mark, a header line of the original labels,
//! then one line per normalized record in column order.
//!
//! Quoting is minimal: only values containing a comma or a double quote are
//! wrapped in double quotes (inner quotes doubled). Values with embedded
//! newlines are written as-is, and header labels are never quoted.

use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

use crate::error::ExportResult;
use crate::models::{ColumnDescriptor, NormalizedRecord};

/// UTF-8 byte-order mark prepended to every export.
pub const BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Suffix appended to the export timestamp.
pub const FILENAME_SUFFIX: &str = "formatted.csv";

/// A ready-to-download export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportFile {
    pub filename: String,
    /// BOM followed by the CSV text.
    pub bytes: Vec<u8>,
}

impl ExportFile {
    /// Write the export into `dir` under its generated filename.
    pub fn write_to_dir(&self, dir: &Path) -> ExportResult<PathBuf> {
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// Quote a field value if it contains a comma or a double quote.
pub fn escape_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Serialize columns and records to CSV text (no BOM, no trailing newline).
pub fn serialize_csv(columns: &[ColumnDescriptor], records: &[NormalizedRecord]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);

    lines.push(
        columns
            .iter()
            .map(|c| c.header_name.as_str())
            .collect::<Vec<_>>()
            .join(","),
    );

    for record in records {
        let line = columns
            .iter()
            .map(|c| {
                record
                    .get(&c.field)
                    .map(|v| escape_field(&v.to_string()))
                    .unwrap_or_default()
            })
            .collect::<Vec<_>>()
            .join(",");
        lines.push(line);
    }

    lines.join("\n")
}

/// CSV text prefixed with the byte-order mark.
pub fn export_bytes(columns: &[ColumnDescriptor], records: &[NormalizedRecord]) -> Vec<u8> {
    let text = serialize_csv(columns, records);
    let mut bytes = Vec::with_capacity(BOM.len() + text.len());
    bytes.extend_from_slice(&BOM);
    bytes.extend_from_slice(text.as_bytes());
    bytes
}

/// `YYYYMMDDhhmmss` followed by [`FILENAME_SUFFIX`].
pub fn export_filename(timestamp: NaiveDateTime) -> String {
    format!("{}{}", timestamp.format("%Y%m%d%H%M%S"), FILENAME_SUFFIX)
}
