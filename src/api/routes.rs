//! API route configuration.
//!
//! Everything here is mounted under `/api`.

use crate::api::handlers::{
    create_url_handler, delete_url_handler, export_handler, filter_by_category_handler,
    history_handler, legacy_redirect_handler, update_category_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post, put},
};

/// Routes protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `POST   /url`                    - Create a short link
/// - `GET    /history`                - Caller's links, newest first (paginated)
/// - `DELETE /delete/{code}`          - Delete one of the caller's links
/// - `GET    /export`                 - Export the caller's links (CSV or JSON)
/// - `GET    /url/filter/{category}`  - Caller's links in a category
/// - `PUT    /url/filter`             - Set or clear a link's category
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/url", post(create_url_handler))
        .route("/history", get(history_handler))
        .route("/delete/{code}", delete(delete_url_handler))
        .route("/export", get(export_handler))
        .route("/url/filter/{category}", get(filter_by_category_handler))
        .route("/url/filter", put(update_category_handler))
}

/// Unauthenticated routes kept for older clients.
///
/// - `GET /url/{code}` - deprecated alias of `GET /{code}`
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/url/{code}", get(legacy_redirect_handler))
}
