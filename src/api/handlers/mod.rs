//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod category;
pub mod export;
pub mod health;
pub mod links;
pub mod redirect;

pub use category::{filter_by_category_handler, update_category_handler};
pub use export::export_handler;
pub use health::health_handler;
pub use links::{create_url_handler, delete_url_handler, history_handler};
pub use redirect::{legacy_redirect_handler, redirect_handler};
