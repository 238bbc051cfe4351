//! Handlers for category filtering and reassignment.

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
};
use validator::Validate;

use crate::api::dto::category::{CategoryListResponse, UpdateCategoryRequest};
use crate::api::dto::url::UrlResponse;
use crate::application::services::Owner;
use crate::error::AppError;
use crate::state::AppState;

/// Lists the caller's links carrying `category`, oldest first.
///
/// # Endpoint
///
/// `GET /api/url/filter/{category}`
///
/// Matching is exact and case-sensitive. Other owners' links are never
/// included.
pub async fn filter_by_category_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Path(category): Path<String>,
) -> Result<Json<CategoryListResponse>, AppError> {
    let records = state
        .link_service
        .list_by_category(&owner.id, &category)
        .await?;

    let items: Vec<UrlResponse> = records
        .into_iter()
        .map(|r| {
            let short_url = state.link_service.short_url(&r.code);
            UrlResponse::from_record(r, short_url)
        })
        .collect();

    Ok(Json(CategoryListResponse {
        category: category.trim().to_string(),
        count: items.len(),
        items,
    }))
}

/// Sets or clears the category of one of the caller's links.
///
/// # Endpoint
///
/// `PUT /api/url/filter`
///
/// ```json
/// { "code": "abc123", "category": "travel" }
/// ```
///
/// `"category": null` clears the label. Repeating a request is harmless.
///
/// # Errors
///
/// 403 if the link belongs to another owner, 404 for an unknown code.
pub async fn update_category_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    payload: Result<Json<UpdateCategoryRequest>, JsonRejection>,
) -> Result<Json<UrlResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let record = state
        .link_service
        .update_category(&owner.id, &payload.code, payload.category)
        .await?;

    let short_url = state.link_service.short_url(&record.code);
    Ok(Json(UrlResponse::from_record(record, short_url)))
}
