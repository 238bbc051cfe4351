//! Core domain entities.
//!
//! Entities are plain data structures. Creation goes through a separate
//! `New*` struct so storage-assigned fields (`id`, `created_at`,
//! `visit_count`) never come from callers.

pub mod url_record;

pub use url_record::{NewUrlRecord, UrlRecord, normalize_category};
