//! Download button for the cleaned CSV

use leptos::*;

use crate::services::export_url;
use crate::{Column, BACKEND_URL};

#[component]
pub fn DownloadButton(columns: ReadSignal<Vec<Column>>) -> impl IntoView {
    // The backend answers 409 until a file with a header has been dropped.
    let disabled = move || columns.with(Vec::is_empty);

    view! {
        <div class="download-section">
            <a
                class="btn btn-primary"
                class:disabled=disabled
                href=export_url(BACKEND_URL)
                download=""
                on:click=move |ev| {
                    if disabled() {
                        ev.prevent_default();
                    } else {
                        log::info!("💾 Downloading cleaned CSV");
                    }
                }
            >
                "Download CSV"
            </a>
        </div>
    }
}
