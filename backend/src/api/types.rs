//! REST API types for frontend integration.
//!
//! Records are sent in the shape the grid consumes directly: flat JSON
//! objects keyed by canonical field name, with an `id` per row.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::models::{ColumnDescriptor, NormalizedRecord};
use crate::transform::{DropResult, ExpansionWarning, Session};

/// Current session as returned by upload, remove and fetch endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Unique job identifier
    pub job_id: String,

    /// Status: "ready", "warning", "empty"
    pub status: String,

    pub columns: Vec<ColumnDescriptor>,

    pub rows: Vec<NormalizedRecord>,

    pub metadata: ResponseMetadata,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    /// Detected encoding of the last upload
    pub encoding: Option<String>,

    /// Data rows in the uploaded file
    pub rows_read: usize,

    /// Records after expansion
    pub record_count: usize,

    /// Human-readable warning lines
    pub warnings: Vec<String>,
}

impl UploadResponse {
    /// Snapshot of a session without upload details.
    pub fn from_session(session: &Session) -> Self {
        let status = if session.records.is_empty() { "empty" } else { "ready" };
        UploadResponse {
            job_id: Uuid::new_v4().to_string(),
            status: status.to_string(),
            columns: session.columns.clone(),
            rows: session.records.clone(),
            metadata: ResponseMetadata {
                record_count: session.records.len(),
                ..ResponseMetadata::default()
            },
        }
    }
}

impl From<&DropResult> for UploadResponse {
    fn from(result: &DropResult) -> Self {
        let mut response = UploadResponse::from_session(&result.session);
        if !result.warnings.is_empty() {
            response.status = "warning".to_string();
        }
        response.metadata.encoding = result.encoding.clone();
        response.metadata.rows_read = result.rows_read;
        response.metadata.warnings = result.warnings.iter().map(ExpansionWarning::to_string).collect();
        response
    }
}

/// Create an error response
pub fn error_response(error: &str) -> Value {
    json!({
        "jobId": Uuid::new_v4().to_string(),
        "status": "error",
        "error": error,
        "columns": [],
        "rows": [],
        "metadata": {
            "encoding": null,
            "rowsRead": 0,
            "recordCount": 0,
            "warnings": []
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEDGER: &str = "Buy Amount,Buy Currency,Tx Hash\n\"1\n2\",X,0x1\n";

    #[test]
    fn test_response_from_drop() {
        let result = Session::default().on_drop_bytes(LEDGER.as_bytes()).unwrap();
        let response = UploadResponse::from(&result);

        assert_eq!(response.status, "ready");
        assert_eq!(response.rows.len(), 2);
        assert_eq!(response.metadata.rows_read, 1);
        assert_eq!(response.metadata.encoding.as_deref(), Some("utf-8"));

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["columns"][0]["field"], "buyAmount");
        assert_eq!(json["columns"][0]["headerName"], "Buy Amount");
        assert_eq!(json["rows"][1]["id"], "0x1_1");
        assert_eq!(json["rows"][1]["buyAmount"], "2");
        assert_eq!(json["metadata"]["recordCount"], 2);
    }

    #[test]
    fn test_warning_status() {
        let csv = "Buy Amount,Sell Amount\n\"1\n2\",\"1\n2\n3\"\n";
        let result = Session::default().on_drop_bytes(csv.as_bytes()).unwrap();
        let response = UploadResponse::from(&result);

        assert_eq!(response.status, "warning");
        assert_eq!(response.metadata.warnings.len(), 1);
        assert!(response.metadata.warnings[0].contains("buyAmount"));
    }

    #[test]
    fn test_empty_session() {
        let response = UploadResponse::from_session(&Session::default());
        assert_eq!(response.status, "empty");
        assert!(response.rows.is_empty());
    }

    #[test]
    fn test_error_response_shape() {
        let err = error_response("boom");
        assert_eq!(err["status"], "error");
        assert_eq!(err["error"], "boom");
        assert!(err["rows"].as_array().unwrap().is_empty());
    }
}
