//! API key authentication middleware.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use serde_json::json;

use crate::{error::AppError, state::AppState};

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Authenticates requests using the `x-api-key` header.
///
/// # Header Format
///
/// ```text
/// x-api-key: <secret>
/// ```
///
/// # Errors
///
/// Returns `401 Unauthorized` if:
/// - the header is missing or empty (`reason: missing`)
/// - the header does not match the configured key (`reason: invalid`)
///
/// A header value that is not valid visible ASCII is treated as invalid.
///
/// # Example
///
/// ```rust,ignore
/// let protected = Router::new()
///     .route("/url", get(list_urls_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let provided = match req.headers().get(API_KEY_HEADER) {
        Some(value) => Some(value.to_str().map_err(|_| {
            AppError::unauthorized("Invalid API key", json!({ "reason": "invalid" }))
        })?),
        None => None,
    };

    st.auth_service.check(provided)?;

    Ok(next.run(req).await)
}
