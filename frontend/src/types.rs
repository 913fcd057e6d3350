//! Common types used across the frontend application.
//!
//! Mirrors the backend's JSON responses; rows stay as JSON objects so the
//! grid can show whatever columns the dropped file had.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

// =============================================================================
// Grid Types
// =============================================================================

/// A flat record keyed by field name, always carrying an `id`.
pub type Row = Map<String, Value>;

/// How a column's cells are rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellRender {
    #[default]
    Text,
    Link,
}

/// Column descriptor sent by the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub field: String,
    pub header_name: String,
    pub width: f64,
    #[serde(default)]
    pub render: CellRender,
}

// =============================================================================
// Log Types
// =============================================================================

/// Log severity level, as streamed by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    /// Get CSS class for styling.
    pub fn css_class(&self) -> &'static str {
        match self {
            LogLevel::Info => "log-info",
            LogLevel::Success => "log-success",
            LogLevel::Warning => "log-warning",
            LogLevel::Error => "log-error",
        }
    }
}

/// A single log line shown in the panel.
#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Local time (HH:MM:SS)
    pub timestamp: String,
}

impl LogEntry {
    pub fn now(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: chrono::Local::now().format("%H:%M:%S").to_string(),
        }
    }
}

// =============================================================================
// API Response Types
// =============================================================================

/// Session snapshot returned by upload, remove and fetch endpoints.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub job_id: String,
    /// "ready", "warning", "empty" or "error"
    pub status: String,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub rows: Vec<Row>,
    pub metadata: ResponseMetadata,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    pub encoding: Option<String>,
    #[serde(default)]
    pub rows_read: usize,
    #[serde(default)]
    pub record_count: usize,
    #[serde(default)]
    pub warnings: Vec<String>,
}

// =============================================================================
// Error Types
// =============================================================================

/// Frontend application errors.
#[derive(Clone, Debug, PartialEq)]
pub enum AppError {
    /// File rejected before upload.
    File(String),
    /// Network/HTTP error.
    Network(String),
    /// Backend answered with an error.
    Server(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::File(msg) => write!(f, "File error: {}", msg),
            AppError::Network(msg) => write!(f, "Network error: {}", msg),
            AppError::Server(msg) => write!(f, "Server error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Result type alias for frontend operations.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_deserialization() {
        let json = r#"{
            "jobId": "123e4567-e89b-12d3-a456-426614174000",
            "status": "warning",
            "columns": [
                { "field": "buyAmount", "headerName": "Buy Amount", "width": 181.0,
                  "render": "text", "rule": { "type": "split", "divisible": true } },
                { "field": "link", "headerName": "Link", "width": 117.5,
                  "render": "link", "rule": { "type": "plain" } }
            ],
            "rows": [
                { "id": "0xABC", "buyAmount": 50.0, "link": "https://x" }
            ],
            "metadata": {
                "encoding": "utf-8",
                "rowsRead": 1,
                "recordCount": 1,
                "warnings": ["Row 1, 'buyAmount': ..."]
            }
        }"#;

        let response: UploadResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.status, "warning");
        assert_eq!(response.columns[1].render, CellRender::Link);
        assert_eq!(response.rows[0]["id"], "0xABC");
        assert_eq!(response.metadata.record_count, 1);
        assert_eq!(response.metadata.warnings.len(), 1);
    }

    #[test]
    fn test_error_response_deserialization() {
        let json = r#"{
            "jobId": "x", "status": "error", "error": "CSV error: CSV file is empty",
            "columns": [], "rows": [],
            "metadata": { "encoding": null, "rowsRead": 0, "recordCount": 0, "warnings": [] }
        }"#;

        let response: UploadResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.status, "error");
        assert!(response.rows.is_empty());
    }
}
