//! DTOs for creating and describing short links.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

use crate::domain::entities::UrlRecord;

/// Characters allowed in a custom code. Surrounding whitespace is trimmed by
/// the link service; an empty or blank code means "generate". Length is
/// checked there too, after trimming.
static CUSTOM_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[A-Za-z0-9_-]*\s*$").unwrap());

/// Body of `POST /api/url`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUrlRequest {
    #[validate(length(min = 1, max = 2048, message = "URL must be 1 to 2048 characters"))]
    pub url: String,

    #[serde(default)]
    #[validate(regex(
        path = "*CUSTOM_CODE_REGEX",
        message = "Custom code can only contain letters, digits, hyphens and underscores"
    ))]
    pub custom_code: Option<String>,

    #[serde(default)]
    #[validate(length(max = 64))]
    pub category: Option<String>,
}

/// A short link as returned by the API.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct UrlResponse {
    pub code: String,
    pub short_url: String,
    pub original_url: String,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub visit_count: i64,
}

impl UrlResponse {
    pub fn from_record(record: UrlRecord, short_url: String) -> Self {
        Self {
            code: record.code,
            short_url,
            original_url: record.original_url,
            category: record.category,
            created_at: record.created_at,
            visit_count: record.visit_count,
        }
    }
}
