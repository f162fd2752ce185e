//! API route configuration.
//!
//! All routes here require the `x-api-key` header via
//! [`crate::api::middleware::auth`].

use crate::api::handlers::{
    create_url_handler, delete_url_handler, list_urls_handler, update_url_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, patch},
};

/// Short URL management routes, protected by API key authentication.
///
/// # Endpoints
///
/// - `POST   /url`        - Create a short link
/// - `GET    /url`        - List short links (filter + pagination)
/// - `PATCH  /url/{uid}`  - Partially update a short link
/// - `DELETE /url/{uid}`  - Delete a short link
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/url", get(list_urls_handler).post(create_url_handler))
        .route(
            "/url/{uid}",
            patch(update_url_handler).delete(delete_url_handler),
        )
}
