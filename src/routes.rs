//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{uid}`      - Short link redirect (public)
//! - `GET  /health`     - Health check: DB and cache (public)
//! - `/url`, `/url/*`   - Link management (`x-api-key` required)
//!
//! # Middleware
//!
//! - **CORS** - Configured origins, answers preflight requests
//! - **Security headers** - `x-content-type-options`, `x-frame-options`, `referrer-policy`
//! - **Tracing** - Structured request/response logging
//! - **Authentication** - API key header on management routes
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{auth, cors, security_headers, tracing};
use crate::config::HttpConfig;
use crate::error::AppError;
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds the router with all routes and middleware except path normalization.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if a configured CORS origin is invalid.
pub fn build_router(state: AppState, http: &HttpConfig) -> Result<Router, AppError> {
    let api_router = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    let mut router = Router::new()
        .route("/{uid}", get(redirect_handler))
        .route("/health", get(health_handler))
        .merge(api_router)
        .with_state(state)
        .layer(tracing::layer());

    if http.security_headers {
        router = security_headers::apply(router);
    }

    if let Some(cors) = cors::layer(http)? {
        router = router.layer(cors);
    }

    Ok(router)
}

/// Constructs the application router, trimming trailing slashes before routing.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if a configured CORS origin is invalid.
pub fn app_router(state: AppState, http: &HttpConfig) -> Result<NormalizePath<Router>, AppError> {
    Ok(NormalizePathLayer::trim_trailing_slash().layer(build_router(state, http)?))
}
