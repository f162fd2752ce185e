//! Cross-origin resource sharing.

use axum::http::{HeaderName, HeaderValue, Method, header::CONTENT_TYPE};
use serde_json::json;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::api::middleware::auth::API_KEY_HEADER;
use crate::config::HttpConfig;
use crate::error::AppError;

/// Builds the CORS layer, or `None` when CORS is disabled.
///
/// `*` in the origin list allows any origin; credentials are then not
/// allowed. Otherwise only the listed origins are echoed back.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if an origin is not a valid header value.
pub fn layer(config: &HttpConfig) -> Result<Option<CorsLayer>, AppError> {
    if !config.cors_enabled {
        tracing::info!("CORS disabled via configuration");
        return Ok(None);
    }

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(API_KEY_HEADER)]);

    if config.cors_allowed_origins.iter().any(|origin| origin == "*") {
        return Ok(Some(cors.allow_origin(AllowOrigin::any())));
    }

    let origins = config
        .cors_allowed_origins
        .iter()
        .map(|origin| {
            origin.parse::<HeaderValue>().map_err(|e| {
                AppError::internal(
                    format!("Invalid CORS origin '{origin}'"),
                    json!({ "reason": e.to_string() }),
                )
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    tracing::info!(origins = ?config.cors_allowed_origins, "CORS enabled with configured origins");

    Ok(Some(
        cors.allow_origin(AllowOrigin::list(origins))
            .allow_credentials(true),
    ))
}
