//! Real-time log streaming using Server-Sent Events (SSE).
//!
//! Connects to the backend's `/api/logs` endpoint and displays
//! processing logs with auto-scroll.

use leptos::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{EventSource, MessageEvent};

use crate::{LogEntry, LogLevel, BACKEND_URL, MAX_LOG_ENTRIES};

fn request_animation_frame(f: impl FnOnce() + 'static) {
    let closure = Closure::once(f);
    if let Some(window) = web_sys::window() {
        if window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .is_err()
        {
            log::warn!("requestAnimationFrame failed");
        }
    }
    closure.forget();
}

/// Parse one SSE payload (`{"level", "message", "indent"}`) into a panel entry.
pub fn parse_sse_log(json: &str) -> Option<LogEntry> {
    let value: serde_json::Value = serde_json::from_str(json).ok()?;
    let level = match value.get("level")?.as_str()? {
        "success" => LogLevel::Success,
        "warning" => LogLevel::Warning,
        "error" => LogLevel::Error,
        _ => LogLevel::Info,
    };
    let indent = value.get("indent").and_then(|i| i.as_u64()).unwrap_or(0) as usize;
    let message = format!(
        "{}{}",
        "  ".repeat(indent),
        value.get("message")?.as_str()?
    );

    Some(LogEntry::now(level, message))
}

/// Append an entry, dropping the oldest past [`MAX_LOG_ENTRIES`].
pub fn push_log(logs: &mut Vec<LogEntry>, entry: LogEntry) {
    logs.push(entry);
    if logs.len() > MAX_LOG_ENTRIES {
        let overflow = logs.len() - MAX_LOG_ENTRIES;
        logs.drain(..overflow);
    }
}

/// Record a local message in the panel and the browser console.
pub fn add_log(set_logs: WriteSignal<Vec<LogEntry>>, level: LogLevel, message: &str) {
    set_logs.update(|logs| push_log(logs, LogEntry::now(level, message)));
    match level {
        LogLevel::Error => log::error!("{}", message),
        LogLevel::Warning => log::warn!("{}", message),
        _ => log::info!("{}", message),
    }
}

/// Start SSE connection to receive backend logs.
/// Should be called ONCE at app startup.
pub fn init_sse_logs(set_logs: WriteSignal<Vec<LogEntry>>) {
    let sse_url = format!("{}/api/logs", BACKEND_URL);

    let event_source = match EventSource::new(&sse_url) {
        Ok(es) => es,
        Err(e) => {
            log::error!("Failed to create EventSource: {:?}", e);
            return;
        }
    };

    let onmessage = Closure::wrap(Box::new(move |event: MessageEvent| {
        if let Some(entry) = event.data().as_string().and_then(|d| parse_sse_log(&d)) {
            set_logs.update(|logs| push_log(logs, entry));
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    event_source.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
    onmessage.forget();

    let onopen = Closure::wrap(Box::new(move |_: web_sys::Event| {
        log::info!("📡 SSE connected to logs stream");
    }) as Box<dyn FnMut(web_sys::Event)>);

    event_source.set_onopen(Some(onopen.as_ref().unchecked_ref()));
    onopen.forget();

    let onerror = Closure::wrap(Box::new(move |_: web_sys::Event| {
        log::warn!("SSE connection error - will auto-reconnect");
    }) as Box<dyn FnMut(web_sys::Event)>);

    event_source.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    onerror.forget();

    // Lives for the whole page.
    std::mem::forget(event_source);
}

#[component]
pub fn LogsPanel(
    logs: ReadSignal<Vec<LogEntry>>,
    set_logs: WriteSignal<Vec<LogEntry>>,
) -> impl IntoView {
    let logs_container = create_node_ref::<leptos::html::Div>();

    create_effect(move |_| {
        let _ = logs.get();
        if let Some(container) = logs_container.get() {
            request_animation_frame(move || {
                container.set_scroll_top(container.scroll_height());
            });
        }
    });

    view! {
        <div class="logs-panel">
            <div class="logs-header">
                <span class="logs-title">"📋 Processing Logs"</span>
                <button class="logs-clear" on:click=move |_| set_logs.set(vec![])>
                    "Clear"
                </button>
            </div>
            <div class="logs-content" node_ref=logs_container>
                {move || {
                    logs.get()
                        .into_iter()
                        .map(|entry| view! {
                            <div class=format!("log-entry {}", entry.level.css_class())>
                                <span class="log-time">"[" {entry.timestamp.clone()} "] "</span>
                                {entry.message.clone()}
                            </div>
                        })
                        .collect_view()
                }}
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sse_log() {
        let entry = parse_sse_log(r#"{"level":"warning","message":"Row 2","indent":1}"#).unwrap();
        assert_eq!(entry.level, LogLevel::Warning);
        assert_eq!(entry.message, "  Row 2");

        let entry = parse_sse_log(r#"{"level":"other","message":"x"}"#).unwrap();
        assert_eq!(entry.level, LogLevel::Info);

        assert!(parse_sse_log("keep-alive").is_none());
    }

    #[test]
    fn test_push_log_caps_entries() {
        let mut logs = Vec::new();
        for i in 0..MAX_LOG_ENTRIES + 5 {
            push_log(&mut logs, LogEntry::now(LogLevel::Info, i.to_string()));
        }
        assert_eq!(logs.len(), MAX_LOG_ENTRIES);
        assert_eq!(logs[0].message, "5");
    }
}
