//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{debug, error};

use crate::api::handlers::urls::find_existing;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its target.
///
/// # Endpoint
///
/// `GET /{uid}` (public, no API key)
///
/// # Request Flow
///
/// 1. Check cache for the redirect target (key: `uid`)
/// 2. On miss, look the link up in the store
/// 3. Populate the cache
/// 4. Return `302 Found` with `Location` set to the target
///
/// Cache errors are logged and fall back to the store.
///
/// # Errors
///
/// Returns 404 Not Found if the code doesn't exist.
pub async fn redirect_handler(
    Path(uid): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let target = match state.cache.get_redirect(&uid).await {
        Ok(Some(cached)) => {
            debug!(uid = %uid, "Cache HIT");
            cached
        }
        Ok(None) => {
            let link = find_existing(&state, &uid).await?;

            // Written before responding; update and delete invalidate after
            // their store write, never before this one.
            if let Err(e) = state.cache.set_redirect(&uid, &link.redirect, None).await {
                error!(error = %e, uid = %uid, "Failed to cache redirect");
            }

            link.redirect
        }
        Err(e) => {
            error!(error = %e, "Cache error");
            find_existing(&state, &uid).await?.redirect
        }
    };

    found(&target)
}

/// Builds a `302 Found` response.
fn found(location: &str) -> Result<Response, AppError> {
    let location = HeaderValue::from_str(location).map_err(|e| {
        AppError::internal(
            "Stored redirect is not a valid Location header",
            json!({ "reason": e.to_string() }),
        )
    })?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}
