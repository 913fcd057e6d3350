//! Backend services.
//!
//! # Services
//!
//! - [`api`] - Upload, remove and fetch the session; export URL

pub mod api;

pub use api::*;
