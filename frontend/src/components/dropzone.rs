//! CSV drop zone with drag & drop, click-to-select and remove.

use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, Event, File, HtmlInputElement};

use super::logs::add_log;
use crate::services::{remove_file, upload_csv};
use crate::{Column, LogEntry, LogLevel, Row, UploadResponse, BACKEND_URL, MAX_FILE_SIZE};

/// Reject files the backend would refuse anyway.
pub fn check_file(name: &str, size: f64) -> Result<(), String> {
    if size > MAX_FILE_SIZE {
        return Err(format!(
            "{} is too large ({:.1} MB, max {:.0} MB)",
            name,
            size / 1024.0 / 1024.0,
            MAX_FILE_SIZE / 1024.0 / 1024.0
        ));
    }
    Ok(())
}

#[component]
pub fn DropZone(
    file_name: ReadSignal<Option<String>>,
    set_file_name: WriteSignal<Option<String>>,
    set_columns: WriteSignal<Vec<Column>>,
    set_rows: WriteSignal<Vec<Row>>,
    set_logs: WriteSignal<Vec<LogEntry>>,
) -> impl IntoView {
    let (is_uploading, set_is_uploading) = create_signal(false);
    let (is_dragging, set_is_dragging) = create_signal(false);
    let (error, set_error) = create_signal(None::<String>);

    let apply = move |response: UploadResponse| {
        set_columns.set(response.columns);
        set_rows.set(response.rows);
    };

    let start_upload = move |file: File| {
        let name = file.name();
        if let Err(e) = check_file(&name, file.size()) {
            add_log(set_logs, LogLevel::Error, &format!("❌ {}", e));
            set_error.set(Some(e));
            return;
        }

        set_error.set(None);
        spawn_local(async move {
            set_is_uploading.set(true);
            add_log(set_logs, LogLevel::Info, &format!("📤 Uploading {}...", name));

            match upload_csv(file, BACKEND_URL).await {
                Ok(response) => {
                    add_log(
                        set_logs,
                        LogLevel::Success,
                        &format!(
                            "✅ {} rows expanded into {} records",
                            response.metadata.rows_read, response.metadata.record_count
                        ),
                    );
                    for warning in &response.metadata.warnings {
                        add_log(set_logs, LogLevel::Warning, warning);
                    }
                    set_file_name.set(Some(name));
                    apply(response);
                }
                Err(e) => {
                    // The backend keeps its previous session, so the grid does too.
                    add_log(set_logs, LogLevel::Error, &format!("❌ Upload failed: {}", e));
                    set_error.set(Some(e.to_string()));
                }
            }

            set_is_uploading.set(false);
        });
    };

    let on_file_change = move |ev: Event| {
        let input: HtmlInputElement = event_target(&ev);
        if let Some(file) = input.files().and_then(|files| files.get(0)) {
            start_upload(file);
        }
        // Allow dropping the same file again.
        input.set_value("");
    };

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragging.set(false);
        if let Some(file) = ev
            .data_transfer()
            .and_then(|dt| dt.files())
            .and_then(|files| files.get(0))
        {
            start_upload(file);
        }
    };

    let on_remove = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        spawn_local(async move {
            match remove_file(BACKEND_URL).await {
                Ok(response) => {
                    add_log(set_logs, LogLevel::Info, "🗑️ File removed");
                    set_file_name.set(None);
                    apply(response);
                }
                Err(e) => {
                    add_log(set_logs, LogLevel::Error, &format!("❌ Remove failed: {}", e));
                }
            }
        });
    };

    let trigger_file_input = move |_| {
        if let Some(input) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("fileInput"))
        {
            if let Some(html_input) = input.dyn_ref::<HtmlInputElement>() {
                html_input.click();
            }
        }
    };

    view! {
        <div
            class="upload-section"
            class:dragging=move || is_dragging.get()
            id="uploadZone"
            on:click=trigger_file_input
            on:dragover=move |ev: DragEvent| {
                ev.prevent_default();
                set_is_dragging.set(true);
            }
            on:dragleave=move |_| set_is_dragging.set(false)
            on:drop=on_drop
        >
            <div class="upload-icon">"📄"</div>
            <div class="upload-text">
                {move || if is_uploading.get() {
                    "⏳ Uploading and expanding...".to_string()
                } else if let Some(name) = file_name.get() {
                    name
                } else {
                    "Drop a CSV file here".to_string()
                }}
            </div>

            <Show when=move || !is_uploading.get() && file_name.get().is_none()>
                <div class="upload-hint">"or click to select"</div>
            </Show>

            <Show when=move || error.get().is_some()>
                <div class="error-message">
                    {move || error.get().unwrap_or_default()}
                </div>
            </Show>

            <input
                type="file"
                id="fileInput"
                accept=".csv,text/csv"
                style="display:none"
                on:click=|ev| ev.stop_propagation()
                on:change=on_file_change
            />

            <Show when=move || file_name.get().is_some() && !is_uploading.get()>
                <button class="btn btn-secondary" on:click=on_remove>"Remove"</button>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_file_size() {
        assert!(check_file("ledger.csv", 1024.0).is_ok());
        assert!(check_file("ledger.csv", MAX_FILE_SIZE).is_ok());

        let err = check_file("huge.csv", MAX_FILE_SIZE + 1.0).unwrap_err();
        assert!(err.contains("huge.csv"));
    }
}
