//! Error types for the Ledgerflat pipeline.
//!
//! - [`CsvError`] - Decoding and tokenizing the uploaded CSV
//! - [`ExportError`] - Writing the cleaned CSV
//! - [`PipelineError`] - Top-level errors returned by the CLI and server
//! - [`ServerError`] - HTTP layer errors
//!
//! Conversions are provided via `From` so `?` works across boundaries.
//! Cell-level problems found while expanding rows are not errors: they are
//! reported as [`crate::transform::ExpansionWarning`]s.

use thiserror::Error;

// =============================================================================
// CSV Parsing Errors
// =============================================================================

/// Errors while reading and tokenizing a CSV file.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Bytes could not be decoded with the detected encoding.
    #[error("Failed to decode content as {0}")]
    EncodingError(String),

    /// The tokenizer rejected the input.
    #[error("Invalid CSV format at line {line}: {message}")]
    ParseError { line: u64, message: String },

    /// Empty file.
    #[error("CSV file is empty")]
    EmptyFile,
}

impl From<csv::Error> for CsvError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        match err.into_kind() {
            csv::ErrorKind::Io(e) => CsvError::IoError(e),
            csv::ErrorKind::Utf8 { err, .. } => CsvError::ParseError {
                line,
                message: format!("invalid UTF-8: {}", err),
            },
            other => CsvError::ParseError {
                line,
                message: format!("{:?}", other),
            },
        }
    }
}

// =============================================================================
// Export Errors
// =============================================================================

/// Errors while producing the cleaned CSV.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Nothing has been loaded yet.
    #[error("No columns loaded, drop a CSV file first")]
    NoColumns,

    /// Failed to write the output file.
    #[error("Failed to write export: {0}")]
    IoError(#[from] std::io::Error),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level errors for a drop-then-export cycle.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// CSV parsing error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Export error.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// JSON output error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Failed to bind or serve.
    #[error("Server IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<CsvError> for ServerError {
    fn from(err: CsvError) -> Self {
        ServerError::Pipeline(err.into())
    }
}

impl From<ExportError> for ServerError {
    fn from(err: ExportError) -> Self {
        ServerError::Pipeline(err.into())
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        let csv_err = CsvError::EmptyFile;
        let pipeline_err: PipelineError = csv_err.into();
        assert!(pipeline_err.to_string().contains("empty"));

        let export_err = ExportError::NoColumns;
        let server_err: ServerError = export_err.into();
        assert!(server_err.to_string().contains("No columns"));
    }

    #[test]
    fn test_parse_error_format() {
        let err = CsvError::ParseError {
            line: 7,
            message: "unterminated quote".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("line 7"));
        assert!(msg.contains("unterminated quote"));
    }
}
