//! Handlers for short URL management endpoints (create, list, update, delete).

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use serde_json::json;

use crate::api::dto::pagination::ListUrlsParams;
use crate::api::dto::url::{
    CreateUrlRequest, DataResponse, UpdateUrlRequest, UrlListResponse, UrlResponse,
};
use crate::api::extract::ValidatedJson;
use crate::domain::entities::ShortUrl;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /url`
///
/// # Request Body
///
/// ```json
/// {
///   "title": "Google",
///   "redirect": "https://google.com",
///   "description": "A search engine"   // optional
/// }
/// ```
///
/// # Response
///
/// `201 Created` with `{"data": ShortUrl}`.
///
/// # Errors
///
/// Returns 400 Bad Request if the body is malformed or fails validation.
/// Returns 409 Conflict if no unique code could be generated.
pub async fn create_url_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUrlRequest>,
) -> Result<(StatusCode, Json<DataResponse<UrlResponse>>), AppError> {
    let created = state.url_service.create(payload.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(created.into())),
    ))
}

/// Lists short links with optional filtering and pagination.
///
/// # Endpoint
///
/// `GET /url`
///
/// # Query Parameters
///
/// - `filter` (optional): substring of title, redirect or description
/// - `page` (optional): page number, starting at 1 (default: 1)
/// - `limit` (optional): items per page, at least 1 (default: 10)
///
/// # Response
///
/// ```json
/// {
///   "data": [ ... ],
///   "meta": {
///     "totalCount": 3,
///     "currentPage": 1,
///     "pageSize": 2,
///     "totalPages": 2,
///     "nextPage": "https://short.example/url?limit=2&page=2",
///     "prevPage": null
///   }
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if `page` or `limit` is not a positive integer.
pub async fn list_urls_handler(
    State(state): State<AppState>,
    params: Result<Query<ListUrlsParams>, QueryRejection>,
) -> Result<Json<UrlListResponse>, AppError> {
    let Query(params) = params?;
    let (page, limit) = (params.page(), params.limit());

    let result = state
        .url_service
        .find_all(params.filter, page, limit)
        .await?;

    Ok(Json(result.into()))
}

/// Partially updates a short link.
///
/// # Endpoint
///
/// `PATCH /url/{uid}`
///
/// # Request Body
///
/// All fields are optional. Only provided fields are changed; the short link
/// itself (`url`) and `id` never change.
///
/// ```json
/// {
///   "title": "New title",
///   "redirect": "https://new-destination.com",
///   "description": null   // clears the description
/// }
/// ```
///
/// # Cache
///
/// The cached redirect for `uid` is invalidated so the next redirect uses the
/// new destination.
///
/// # Errors
///
/// Returns 404 Not Found if no link has this code.
/// Returns 400 Bad Request if validation fails.
pub async fn update_url_handler(
    Path(uid): Path<String>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UpdateUrlRequest>,
) -> Result<Json<DataResponse<UrlResponse>>, AppError> {
    let existing = find_existing(&state, &uid).await?;

    let updated = state
        .url_service
        .update(existing.id, payload.into())
        .await?;

    invalidate_cache(&state, &uid).await;

    Ok(Json(DataResponse::new(updated.into())))
}

/// Deletes a short link.
///
/// # Endpoint
///
/// `DELETE /url/{uid}`
///
/// # Behavior
///
/// The row is physically removed and returned as `{"data": ShortUrl}`.
/// Subsequent redirects for this code return 404.
///
/// # Errors
///
/// Returns 404 Not Found if no link has this code.
pub async fn delete_url_handler(
    Path(uid): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<DataResponse<UrlResponse>>, AppError> {
    let existing = find_existing(&state, &uid).await?;

    let removed = state.url_service.remove(existing.id).await?;

    invalidate_cache(&state, &uid).await;

    Ok(Json(DataResponse::new(removed.into())))
}

/// Resolves `uid` to its row, turning absence into a 404.
pub(crate) async fn find_existing(state: &AppState, uid: &str) -> Result<ShortUrl, AppError> {
    state.url_service.find_one(uid).await?.ok_or_else(|| {
        AppError::not_found(
            format!("Url with uid {uid} not found"),
            json!({ "uid": uid }),
        )
    })
}

async fn invalidate_cache(state: &AppState, uid: &str) {
    if let Err(e) = state.cache.invalidate(uid).await {
        tracing::warn!(error = %e, uid, "Failed to invalidate cache");
    }
}
