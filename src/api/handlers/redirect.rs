//! Handlers for short URL redirects.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Look the code up in the redirect cache
/// 2. On a miss, read the record from storage and cache it
/// 3. Enqueue a visit event for the background worker (never blocks)
/// 4. Return `302 Found` with `Location` set to the original URL
///
/// A full visit queue drops the visit; the redirect still succeeds.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let original_url = state.resolver.resolve(&code).await?;
    found(&original_url)
}

/// Deprecated alias of [`redirect_handler`].
///
/// # Endpoint
///
/// `GET /api/url/{code}`
///
/// Behaves exactly like `GET /{code}` and additionally sets the
/// `Deprecation` header and a `Link` to the canonical path.
pub async fn legacy_redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    warn!(code = %code, "Deprecated redirect path /api/url/{{code}} used");

    let original_url = state.resolver.resolve(&code).await?;
    let mut response = found(&original_url)?;

    let headers = response.headers_mut();
    headers.insert("deprecation", HeaderValue::from_static("true"));
    if let Ok(link) = HeaderValue::from_str(&format!("</{code}>; rel=\"successor-version\"")) {
        headers.insert(header::LINK, link);
    }

    Ok(response)
}

fn found(original_url: &str) -> Result<Response, AppError> {
    let location = HeaderValue::from_str(original_url).map_err(|_| {
        AppError::internal(
            "Stored URL is not a valid header value",
            serde_json::json!({}),
        )
    })?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}
