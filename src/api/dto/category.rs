//! DTOs for category filtering and reassignment.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::url::UrlResponse;

/// Body of `PUT /api/url/filter`.
///
/// A `null`, missing or blank `category` clears the label.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, max = 32, message = "Code must be 1 to 32 characters"))]
    pub code: String,

    #[serde(default)]
    #[validate(length(max = 64))]
    pub category: Option<String>,
}

/// Response of `GET /api/url/filter/{category}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryListResponse {
    pub category: String,
    pub count: usize,
    pub items: Vec<UrlResponse>,
}
