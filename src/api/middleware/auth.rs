//! Bearer token authentication middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::{error::AppError, state::AppState};

/// Authenticates requests using Bearer tokens from the Authorization header.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// On success the resolved [`crate::application::services::Owner`] is
/// inserted into the request extensions and the request continues. Handlers
/// read it with `Extension<Owner>`.
///
/// # Errors
///
/// Short-circuits with `401 Unauthorized` and `WWW-Authenticate: Bearer` if
/// the header is missing or malformed, or the token is unknown or revoked.
///
/// # Example
///
/// ```rust,ignore
/// let protected = Router::new()
///     .route("/history", get(history_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Authorization header is missing or invalid" }),
            )
        })?;

    let owner = st.auth_service.authenticate(&token).await?;
    tracing::debug!(owner = %owner.id, "Authenticated");

    parts.extensions.insert(owner);
    let req = Request::from_parts(parts, body);

    Ok(next.run(req).await)
}
