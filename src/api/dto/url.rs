//! DTOs for the short URL endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::{PageMeta, UrlPage};
use crate::domain::entities::{CreateShortUrl, ShortUrl, ShortUrlPatch};

/// Request body for `POST /url`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUrlRequest {
    /// Human readable label.
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,

    /// Absolute URL the short link redirects to.
    #[validate(url(message = "Invalid URL format"))]
    pub redirect: String,

    pub description: Option<String>,
}

impl From<CreateUrlRequest> for CreateShortUrl {
    fn from(request: CreateUrlRequest) -> Self {
        Self {
            title: request.title,
            redirect: request.redirect,
            description: request.description,
        }
    }
}

/// Request body for `PATCH /url/{uid}`.
///
/// All fields are optional. `description: null` clears the description,
/// an absent `description` leaves it unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUrlRequest {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: Option<String>,

    #[validate(url(message = "Invalid URL format"))]
    pub redirect: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
}

impl From<UpdateUrlRequest> for ShortUrlPatch {
    fn from(request: UpdateUrlRequest) -> Self {
        Self {
            title: request.title,
            redirect: request.redirect,
            description: request.description,
        }
    }
}

/// JSON representation of a short link.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlResponse {
    pub id: i64,
    pub url: String,
    pub redirect: String,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ShortUrl> for UrlResponse {
    fn from(url: ShortUrl) -> Self {
        Self {
            id: url.id,
            url: url.url,
            redirect: url.redirect,
            title: url.title,
            description: url.description,
            created_at: url.created_at,
            updated_at: url.updated_at,
        }
    }
}

/// Envelope for single-resource responses: `{"data": ...}`.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Response for `GET /url`.
#[derive(Debug, Serialize)]
pub struct UrlListResponse {
    pub data: Vec<UrlResponse>,
    pub meta: PaginationMeta,
}

/// Pagination block of [`UrlListResponse`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub total_count: i64,
    pub current_page: u32,
    pub page_size: u32,
    pub total_pages: i64,
    pub next_page: Option<String>,
    pub prev_page: Option<String>,
}

impl From<PageMeta> for PaginationMeta {
    fn from(meta: PageMeta) -> Self {
        Self {
            total_count: meta.total_count,
            current_page: meta.current_page,
            page_size: meta.page_size,
            total_pages: meta.total_pages,
            next_page: meta.next_page,
            prev_page: meta.prev_page,
        }
    }
}

impl From<UrlPage> for UrlListResponse {
    fn from(page: UrlPage) -> Self {
        Self {
            data: page.data.into_iter().map(Into::into).collect(),
            meta: page.meta.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_validation() {
        let ok: CreateUrlRequest =
            serde_json::from_value(json!({ "title": "Google", "redirect": "https://google.com" }))
                .unwrap();
        assert!(ok.validate().is_ok());
        assert!(ok.description.is_none());

        let bad: CreateUrlRequest =
            serde_json::from_value(json!({ "title": "", "redirect": "google" })).unwrap();
        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
        assert!(errors.field_errors().contains_key("redirect"));
    }

    #[test]
    fn test_create_request_requires_fields() {
        let result =
            serde_json::from_value::<CreateUrlRequest>(json!({ "description": "A search engine" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_update_request_description_semantics() {
        let absent: UpdateUrlRequest = serde_json::from_value(json!({ "title": "X" })).unwrap();
        assert_eq!(absent.description, None);

        let cleared: UpdateUrlRequest =
            serde_json::from_value(json!({ "description": null })).unwrap();
        assert_eq!(cleared.description, Some(None));

        let set: UpdateUrlRequest =
            serde_json::from_value(json!({ "description": "New" })).unwrap();
        assert_eq!(set.description, Some(Some("New".to_string())));
    }

    #[test]
    fn test_url_response_is_camel_case() {
        let now = Utc::now();
        let response = UrlResponse::from(ShortUrl {
            id: 1,
            url: "https://short.example/abc".to_string(),
            redirect: "https://google.com".to_string(),
            title: "Google".to_string(),
            description: None,
            created_at: now,
            updated_at: now,
        });

        let value = serde_json::to_value(DataResponse::new(response)).unwrap();
        assert_eq!(value["data"]["id"], 1);
        assert!(value["data"]["description"].is_null());
        assert!(value["data"].get("createdAt").is_some());
        assert!(value["data"].get("updatedAt").is_some());
        assert!(value["data"].get("created_at").is_none());
    }
}
