//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`          - Short link redirect (public)
//! - `GET  /health`          - Health check: storage, visit queue, cache (public)
//! - `GET  /api/url/{code}`  - Deprecated redirect alias (public)
//! - `/api/*`                - Link management (Bearer token required)
//!
//! # Middleware
//!
//! Applied outermost first: path normalization, tracing, per-IP rate limit
//! (`/api` only), authentication (protected routes only).

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::rate_limit::{self, RateLimit};
use crate::api::middleware::{auth, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Router options that depend on the deployment.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouterOptions {
    /// Per-IP limit on `/api`; `None` disables rate limiting.
    pub rate_limit: Option<RateLimit>,
    /// Read the client IP from forwarding headers instead of the peer
    /// address. Enable only behind a trusted reverse proxy.
    pub behind_proxy: bool,
}

/// Builds the router with every route and middleware except path
/// normalization.
pub fn build_router(state: AppState, options: RouterOptions) -> Router {
    let protected = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    let api_router = with_rate_limit(
        protected.merge(api::routes::public_routes()),
        options,
    );

    Router::new()
        .route("/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application router, trimming trailing slashes before
/// routing.
pub fn app_router(state: AppState, options: RouterOptions) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(build_router(state, options))
}

fn with_rate_limit(router: Router<AppState>, options: RouterOptions) -> Router<AppState> {
    let Some(limit) = options.rate_limit else {
        return router;
    };

    if options.behind_proxy {
        if let Some(layer) = rate_limit::forwarded_ip_layer(limit) {
            return router.layer(layer);
        }
    } else if let Some(layer) = rate_limit::peer_ip_layer(limit) {
        return router.layer(layer);
    }

    ::tracing::warn!(?limit, "Invalid rate limit settings, rate limiting disabled");
    router
}
