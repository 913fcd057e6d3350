//! HTTP client for the ledgerflat backend session endpoints.

use gloo_net::http::{Request, Response};
use web_sys::{File, FormData};

use crate::types::{AppError, AppResult, UploadResponse};

/// Upload a CSV file; the backend replaces its session with the result.
pub async fn upload_csv(file: File, backend_url: &str) -> AppResult<UploadResponse> {
    let form_data = FormData::new()
        .map_err(|e| AppError::Network(format!("Failed to create FormData: {:?}", e)))?;

    form_data
        .append_with_blob_and_filename("file", &file, &file.name())
        .map_err(|e| AppError::Network(format!("Failed to append file: {:?}", e)))?;

    let request = Request::post(&format!("{}/api/upload", backend_url))
        .body(form_data)
        .map_err(|e| AppError::Network(format!("Failed to build request: {}", e)))?;

    let response = request
        .send()
        .await
        .map_err(|e| AppError::Network(format!("HTTP request failed: {}", e)))?;

    read_session(response).await
}

/// Remove the dropped file. Columns stay, records are cleared.
pub async fn remove_file(backend_url: &str) -> AppResult<UploadResponse> {
    let response = Request::delete(&format!("{}/api/upload", backend_url))
        .send()
        .await
        .map_err(|e| AppError::Network(format!("HTTP request failed: {}", e)))?;

    read_session(response).await
}

/// Current session held by the backend.
pub async fn fetch_rows(backend_url: &str) -> AppResult<UploadResponse> {
    let response = Request::get(&format!("{}/api/rows", backend_url))
        .send()
        .await
        .map_err(|e| AppError::Network(format!("HTTP request failed: {}", e)))?;

    read_session(response).await
}

/// URL the download button points at.
pub fn export_url(backend_url: &str) -> String {
    format!("{}/api/export", backend_url)
}

async fn read_session(response: Response) -> AppResult<UploadResponse> {
    if !response.ok() {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(AppError::Server(format!(
            "({}) {}",
            status,
            error_message(&body)
        )));
    }

    response
        .json::<UploadResponse>()
        .await
        .map_err(|e| AppError::Network(format!("Failed to parse response: {}", e)))
}

/// Pull the `error` field out of an error body, falling back to the raw text.
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
