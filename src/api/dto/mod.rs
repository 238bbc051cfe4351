//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation.

pub mod category;
pub mod export;
pub mod health;
pub mod history;
pub mod pagination;
pub mod url;
