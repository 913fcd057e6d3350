//! Ledgerflat - Frontend Rust/Leptos Application
//!
//! A WebAssembly shell for dropping a ledger CSV, reviewing the flattened
//! records and downloading the cleaned file.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        App                                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Banner (random slogan)                                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  MainContent                                                 │
//! │  ├── DropZone (drop / select / remove)                      │
//! │  ├── DownloadButton                                         │
//! │  ├── DataGrid (when columns are known)                      │
//! │  └── LogsPanel (when logs exist)                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Footer                                                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`types`] - API and log types
//! - [`grid`] - Sorting, pagination and selection logic
//! - [`components`] - UI components
//! - [`services`] - Backend communication

use leptos::*;
use leptos_meta::*;
use leptos_router::*;
use wasm_bindgen::prelude::*;

// =============================================================================
// Module declarations
// =============================================================================

pub mod config;
pub mod types;
pub mod grid;
pub mod components;
pub mod services;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::*;

pub use types::{
    // Grid
    CellRender, Column, Row,
    // Logs
    LogEntry, LogLevel,
    // API
    UploadResponse, ResponseMetadata,
    // Errors
    AppError, AppResult,
};

pub use components::*;

pub use services::*;

// =============================================================================
// Application Entry Point
// =============================================================================

/// WASM entry point - called automatically by trunk.
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    _ = console_log::init_with_level(log::Level::Debug);

    log::info!("🦀 Ledgerflat - Starting Leptos App");

    mount_to_body(|| view! { <App/> });
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="Ledgerflat"/>
        <Router>
            <main>
                <Routes>
                    <Route path="/" view=MainContent/>
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn MainContent() -> impl IntoView {
    let (columns, set_columns) = create_signal(Vec::<Column>::new());
    let (rows, set_rows) = create_signal(Vec::<Row>::new());
    let (file_name, set_file_name) = create_signal(None::<String>);
    let (logs, set_logs) = create_signal(Vec::<LogEntry>::new());

    // Initialize SSE connection ONCE at app startup
    init_sse_logs(set_logs);

    // Pick up whatever the backend already holds (e.g. after a reload).
    spawn_local(async move {
        match fetch_rows(BACKEND_URL).await {
            Ok(response) => {
                set_columns.set(response.columns);
                set_rows.set(response.rows);
            }
            Err(e) => log::warn!("Could not load current session: {}", e),
        }
    });

    view! {
        <Banner/>

        <div class="container">
            <DropZone
                file_name=file_name
                set_file_name=set_file_name
                set_columns=set_columns
                set_rows=set_rows
                set_logs=set_logs
            />

            <DownloadButton columns=columns/>

            <Show when=move || !columns.with(Vec::is_empty)>
                <DataGrid columns=columns rows=rows/>
            </Show>

            <Show when=move || !logs.with(Vec::is_empty)>
                <LogsPanel logs=logs set_logs=set_logs/>
            </Show>
        </div>

        <Footer/>
    }
}
