//! Application configuration.
//!
//! Hardcoded for local development against `ledgerflat serve`.

/// Backend API base URL.
pub const BACKEND_URL: &str = "http://localhost:3000";

/// Rows per grid page.
pub const PAGE_SIZE: usize = 50;

/// Maximum file size accepted by the drop zone (in bytes).
///
/// Matches the backend's default upload limit.
pub const MAX_FILE_SIZE: f64 = 50.0 * 1024.0 * 1024.0;

/// Maximum logs to keep in memory.
pub const MAX_LOG_ENTRIES: usize = 100;

/// Banner slogans, one picked at random per page load.
pub const SLOGANS: [&str; 8] = [
    "納税思想の高揚",
    "自主納税の推進",
    "納税貯蓄",
    "税を考える",
    "確定申告",
    "ぜい ぜい ぜい ぜい ぜい ぜい ぜい ぜい ぜい ぜい ぜい",
    "笑顔で納税",
    "納税義務",
];
