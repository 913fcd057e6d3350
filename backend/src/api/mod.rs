//! HTTP API module.
//!
//! Server, response types and the log broadcaster used by the whole crate.

pub mod logs;
pub mod server;
pub mod types;

pub use logs::*;
pub use server::{router, start_server, SharedSession};
pub use types::*;
