//! UI Components for the Ledgerflat application.
//!
//! # Layout Components
//! - [`Banner`] - Title and random tax slogan
//! - [`Footer`] - Page footer
//!
//! # Feature Components
//! - [`DropZone`] - CSV drop zone with remove button
//! - [`DataGrid`] - Sortable, paginated records with multi-select
//! - [`DownloadButton`] - Cleaned CSV download
//! - [`LogsPanel`] - Real-time processing logs (SSE)

mod banner;
mod data_grid;
mod download;
mod dropzone;
mod footer;
mod logs;

pub use banner::*;
pub use data_grid::*;
pub use download::*;
pub use dropzone::*;
pub use footer::*;
pub use logs::*;
