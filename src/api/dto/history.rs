//! DTO for the paginated link history.

use serde::{Deserialize, Serialize};

use super::url::UrlResponse;

/// Response of `GET /api/history`, newest links first.
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub page: u32,
    pub page_size: u32,
    pub total: i64,
    pub items: Vec<UrlResponse>,
}
