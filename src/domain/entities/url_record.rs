//! URL record entity representing a short code mapping.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A stored short code → original URL mapping with its metadata.
///
/// `code`, `original_url`, `owner_id` and `created_at` never change after
/// creation. `category` can be reassigned by the owner and `visit_count`
/// only grows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlRecord {
    /// Storage sequence number, increasing in creation order.
    pub id: i64,
    pub code: String,
    pub original_url: String,
    pub owner_id: String,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub visit_count: i64,
}

impl UrlRecord {
    /// Returns true if `owner_id` created this record.
    pub fn is_owned_by(&self, owner_id: &str) -> bool {
        self.owner_id == owner_id
    }

    /// Returns true if the record carries exactly this category label.
    pub fn has_category(&self, category: &str) -> bool {
        self.category.as_deref() == Some(category)
    }
}

/// Input data for inserting a new record.
///
/// The store assigns `id`, `created_at` and a zero `visit_count`.
#[derive(Debug, Clone)]
pub struct NewUrlRecord {
    pub code: String,
    pub original_url: String,
    pub owner_id: String,
    pub category: Option<String>,
}

/// Normalizes a category label: trims whitespace and maps blank labels to `None`.
pub fn normalize_category(category: Option<String>) -> Option<String> {
    category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}
