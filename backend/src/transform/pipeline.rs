//! Session state and the drop / remove / export cycle.
//!
//! A [`Session`] is what the grid displays: the interpreted columns and the
//! flat records. Operations never mutate a session in place; each returns
//! the next session value and the caller decides whether to keep it.
//!
//! ```rust,ignore
//! use ledgerflat::Session;
//!
//! let session = Session::default();
//! let dropped = session.on_drop_bytes(&std::fs::read("ledger.csv")?)?;
//! let session = dropped.session;
//! let file = session.export(chrono::Local::now().naive_local())?;
//! std::fs::write(&file.filename, &file.bytes)?;
//! ```

use chrono::NaiveDateTime;
use serde::Serialize;

use super::expander::{expand_rows, ExpansionWarning};
use super::header::interpret_header;
use crate::api::logs::{log_expansion_warnings, log_info, log_success, log_warning};
use crate::error::{ExportError, ExportResult, PipelineResult};
use crate::export::{export_bytes, export_filename, ExportFile};
use crate::models::{ColumnDescriptor, NormalizedRecord, RawRow};
use crate::parser::parse_bytes;

/// Columns and records currently displayed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Session {
    pub columns: Vec<ColumnDescriptor>,
    pub records: Vec<NormalizedRecord>,
}

/// Outcome of a file drop.
#[derive(Debug, Clone)]
pub struct DropResult {
    /// The session to display next
    pub session: Session,
    /// Cells normalized with a fallback
    pub warnings: Vec<ExpansionWarning>,
    /// Data rows read, header excluded
    pub rows_read: usize,
    /// Detected encoding, when the drop came from raw bytes
    pub encoding: Option<String>,
}

impl Session {
    pub fn new(columns: Vec<ColumnDescriptor>, records: Vec<NormalizedRecord>) -> Self {
        Self { columns, records }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.records.is_empty()
    }

    /// Build the next session from already-tokenized rows (header first).
    ///
    /// No rows at all leaves the session unchanged. A header-only input
    /// replaces the columns and empties the records.
    pub fn on_drop(&self, rows: &[RawRow]) -> DropResult {
        let Some(header) = rows.first() else {
            return DropResult {
                session: self.clone(),
                warnings: Vec::new(),
                rows_read: 0,
                encoding: None,
            };
        };

        let columns = interpret_header(header);
        let expansion = expand_rows(rows, &columns);

        DropResult {
            session: Session::new(columns, expansion.records),
            warnings: expansion.warnings,
            rows_read: expansion.rows_read,
            encoding: None,
        }
    }

    /// Decode, tokenize and expand an uploaded file.
    ///
    /// On error `self` is untouched, so the caller keeps displaying it.
    pub fn on_drop_bytes(&self, bytes: &[u8]) -> PipelineResult<DropResult> {
        log_info(format!("📖 Reading CSV ({} bytes)...", bytes.len()));
        let parsed = parse_bytes(bytes)?;
        log_success(format!("Detected encoding: {}", parsed.encoding));
        log_success(format!("Read {} data rows", parsed.data_row_count()));

        log_info(format!("📋 {} columns:", parsed.headers().len()));
        for (i, label) in parsed.headers().iter().enumerate() {
            log_info(format!("[{:2}] {}", i + 1, label));
        }

        log_info("⚙️  Expanding multi-line rows...");
        let mut result = self.on_drop(&parsed.rows);
        result.encoding = Some(parsed.encoding);

        log_success(format!(
            "{} rows expanded into {} records",
            result.rows_read,
            result.session.records.len()
        ));
        log_expansion_warnings(&result.warnings);

        Ok(result)
    }

    /// Clear the records after the file is removed. Columns are kept.
    pub fn on_remove(&self) -> Session {
        log_info("🗑️  File removed, records cleared");
        Session {
            columns: self.columns.clone(),
            records: Vec::new(),
        }
    }

    /// Serialize the current session for download.
    pub fn export(&self, now: NaiveDateTime) -> ExportResult<ExportFile> {
        if self.columns.is_empty() {
            log_warning("Export requested before any file was dropped");
            return Err(ExportError::NoColumns);
        }

        let file = ExportFile {
            filename: export_filename(now),
            bytes: export_bytes(&self.columns, &self.records),
        };
        log_success(format!(
            "💾 Exported {} records as {}",
            self.records.len(),
            file.filename
        ));
        Ok(file)
    }
}
