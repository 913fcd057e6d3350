//! Transformation module.
//!
//! - Header: raw labels to column descriptors
//! - Expander: multi-line rows to flat records
//! - Pipeline: session state and the drop / remove / export cycle

pub mod expander;
pub mod header;
pub mod pipeline;

pub use expander::{expand_rows, expansion_count, Expansion, ExpansionWarning, WarningKind};
pub use header::{interpret_header, to_camel, width_hint};
pub use pipeline::{DropResult, Session};
