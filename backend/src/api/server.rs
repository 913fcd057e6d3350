//! HTTP Server for the ledgerflat API.
//!
//! # API Endpoints
//!
//! | Method | Path          | Description                                  |
//! |--------|---------------|----------------------------------------------|
//! | GET    | `/health`     | Health check                                 |
//! | POST   | `/api/upload` | Upload a ledger CSV, replaces the session    |
//! | DELETE | `/api/upload` | Remove the file, clears the records          |
//! | GET    | `/api/rows`   | Current columns and records                  |
//! | GET    | `/api/export` | Download the cleaned CSV                     |
//! | GET    | `/api/logs`   | SSE stream for real-time logs                |

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{sse::Event, IntoResponse, Json, Response, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};
use tokio::sync::RwLock;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use super::logs::{log_error, LOG_BROADCASTER};
use super::types::{error_response, UploadResponse};
use crate::config::ServerConfig;
use crate::error::{ExportError, PipelineError, ServerResult};
use crate::transform::Session;

/// Session shared by all handlers.
///
/// Upload and remove hold the write lock for the whole transform, so two
/// drops never interleave.
pub type SharedSession = Arc<RwLock<Session>>;

type ApiError = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, message: &str) -> ApiError {
    (status, Json(error_response(message)))
}

/// Build the router with its CORS layer and optional static frontend.
pub fn router(state: SharedSession, config: &ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE, header::CONTENT_DISPOSITION]);

    let api = Router::new()
        .route("/health", get(health))
        .route("/api/upload", post(upload_csv).delete(remove_file))
        .route("/api/rows", get(current_rows))
        .route("/api/export", get(export_csv))
        .route("/api/logs", get(sse_logs))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .with_state(state);

    let app = match &config.static_dir {
        Some(dir) => api.fallback_service(ServeDir::new(dir)),
        None => api.route("/", get(health)),
    };

    app.layer(cors)
}

/// Start the HTTP server
pub async fn start_server(config: ServerConfig) -> ServerResult<()> {
    let state: SharedSession = Arc::new(RwLock::new(Session::default()));
    let app = router(state, &config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    println!("🚀 Ledgerflat server running on http://localhost:{}", config.port);
    println!("   POST   /api/upload - Upload ledger CSV");
    println!("   DELETE /api/upload - Remove file");
    println!("   GET    /api/rows   - Current records");
    println!("   GET    /api/export - Download cleaned CSV");
    println!("   GET    /api/logs   - SSE log stream");
    println!("   GET    /health     - Health check");
    if let Some(ref dir) = config.static_dir {
        println!("   Serving frontend from {}", dir.display());
    }
    println!();

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "ledgerflat",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "upload": "POST /api/upload",
            "remove": "DELETE /api/upload",
            "rows": "GET /api/rows",
            "export": "GET /api/export",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| {
        let entry = result.ok()?;
        let json = serde_json::to_string(&entry).ok()?;
        Some(Ok(Event::default().data(json)))
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Upload CSV endpoint
async fn upload_csv(
    State(state): State<SharedSession>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, &format!("Multipart error: {}", e)))?
    {
        if field.name() == Some("file") {
            file_name = field.file_name().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| api_error(StatusCode::BAD_REQUEST, &format!("Read error: {}", e)))?;
            file_data = Some(bytes.to_vec());
        }
    }

    let bytes = file_data.ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "No file provided"))?;

    println!("\n{}", "=".repeat(70));
    println!(
        "📄 NEW UPLOAD: {} ({} bytes)",
        file_name.as_deref().unwrap_or("unknown"),
        bytes.len()
    );
    println!("{}\n", "=".repeat(70));

    let mut session = state.write().await;
    let result = session.on_drop_bytes(&bytes).map_err(|e| {
        log_error(format!("Upload rejected: {}", e));
        let status = match e {
            PipelineError::Csv(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        api_error(status, &e.to_string())
    })?;

    let response = UploadResponse::from(&result);
    *session = result.session;

    Ok(Json(response))
}

/// Remove the dropped file: records are cleared, columns kept.
async fn remove_file(State(state): State<SharedSession>) -> Json<UploadResponse> {
    let mut session = state.write().await;
    *session = session.on_remove();
    Json(UploadResponse::from_session(&session))
}

async fn current_rows(State(state): State<SharedSession>) -> Json<UploadResponse> {
    let session = state.read().await;
    Json(UploadResponse::from_session(&session))
}

/// Download the cleaned CSV as an attachment.
async fn export_csv(State(state): State<SharedSession>) -> Result<Response, ApiError> {
    let session = state.read().await;
    let file = session
        .export(chrono::Local::now().naive_local())
        .map_err(|e| match e {
            ExportError::NoColumns => api_error(StatusCode::CONFLICT, &e.to_string()),
            ExportError::IoError(_) => api_error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
        })?;

    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", file.filename))
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("text/csv; charset=utf-8")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    )
        .into_response())
}
