//! # Ledgerflat - flatten multi-line ledger CSV exports
//!
//! Crypto exchange and wallet exports often bundle several legs of one
//! transaction into a single CSV row, one leg per line inside a cell.
//! Ledgerflat expands those rows into one flat record per leg, then
//! re-exports a cleaned CSV ready for tax tooling.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│  Expander   │────▶│  Clean CSV  │
//! │ (UTF8/SJIS) │     │  (auto-enc) │     │ (per field) │     │   (+BOM)    │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ledgerflat::{parse_csv_file, Session};
//!
//! let parsed = parse_csv_file("ledger.csv")?;
//! let session = Session::default().on_drop(&parsed.rows).session;
//! println!("{} records", session.records.len());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`models`] - Field rules, column descriptors, records
//! - [`parser`] - CSV decoding and tokenizing
//! - [`transform`] - Header interpretation, row expansion, session
//! - [`export`] - Cleaned CSV serialization
//! - [`config`] - Server configuration
//! - [`api`] - HTTP API server and log streaming

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Export
pub mod export;

// Configuration
pub mod config;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{CsvError, ExportError, PipelineError, ServerError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{CellRender, CellValue, ColumnDescriptor, FieldRule, NormalizedRecord, RawRow};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{decode_content, detect_encoding, parse_bytes, parse_csv_file, parse_rows, ParsedCsv};

// =============================================================================
// Re-exports - Transform
// =============================================================================

pub use transform::{
    expand_rows,
    expansion_count,
    interpret_header,
    to_camel,
    DropResult,
    Expansion,
    ExpansionWarning,
    Session,
    WarningKind,
};

// =============================================================================
// Re-exports - Export
// =============================================================================

pub use export::{escape_field, export_bytes, export_filename, serialize_csv, ExportFile};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::{error_response, ResponseMetadata, UploadResponse};
pub use config::ServerConfig;

// Server
pub mod server {
    pub use crate::api::server::{router, start_server};
}
