//! Handlers for link creation, history and deletion.

use axum::{
    Extension, Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::history::HistoryResponse;
use crate::api::dto::pagination::PaginationParams;
use crate::api::dto::url::{CreateUrlRequest, UrlResponse};
use crate::application::services::{CreateLink, Owner};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link owned by the caller.
///
/// # Endpoint
///
/// `POST /api/url`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/some/long/path",
///   "custom_code": "my-link",   // optional; empty or absent means generate
///   "category": "travel"        // optional
/// }
/// ```
///
/// # Errors
///
/// - 400 for an invalid URL, custom code or body
/// - 409 if the custom code is taken
/// - 503 if no free code was found within the attempt budget
pub async fn create_url_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    payload: Result<Json<CreateUrlRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UrlResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let record = state
        .link_service
        .create(
            &owner.id,
            CreateLink {
                url: payload.url,
                custom_code: payload.custom_code,
                category: payload.category,
            },
        )
        .await?;

    let short_url = state.link_service.short_url(&record.code);
    Ok((
        StatusCode::CREATED,
        Json(UrlResponse::from_record(record, short_url)),
    ))
}

/// Lists the caller's links, newest first.
///
/// # Endpoint
///
/// `GET /api/history?page=1&page_size=20`
pub async fn history_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<HistoryResponse>, AppError> {
    let page = params.validate()?;

    let (records, total) = state
        .link_service
        .history(&owner.id, page.offset(), page.limit())
        .await?;

    let items = records
        .into_iter()
        .map(|r| {
            let short_url = state.link_service.short_url(&r.code);
            UrlResponse::from_record(r, short_url)
        })
        .collect();

    Ok(Json(HistoryResponse {
        page: page.page,
        page_size: page.page_size,
        total,
        items,
    }))
}

/// Deletes one of the caller's links.
///
/// # Endpoint
///
/// `DELETE /api/delete/{code}`
///
/// # Response Codes
///
/// - **204 No Content**: deleted; the code resolves to 404 from now on
/// - **403 Forbidden**: the link belongs to another owner
/// - **404 Not Found**: unknown code
pub async fn delete_url_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Path(code): Path<String>,
) -> Result<StatusCode, AppError> {
    state.link_service.delete(&owner.id, &code).await?;
    Ok(StatusCode::NO_CONTENT)
}
