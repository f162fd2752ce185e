//! Short URL lifecycle and listing service.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio_retry::RetryIf;
use tokio_retry::strategy::FixedInterval;
use url::form_urlencoded;

use crate::domain::entities::{CreateShortUrl, NewShortUrl, ShortUrl, ShortUrlPatch};
use crate::domain::repositories::{UrlQuery, UrlRepository};
use crate::error::AppError;
use crate::utils::code_generator;

/// Length of generated codes.
pub const CODE_LENGTH: usize = 10;

/// Page used when the caller does not ask for one.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_LIMIT: u32 = 10;

/// Total insert attempts when a generated code collides with an existing one.
const MAX_CREATE_ATTEMPTS: usize = 3;

const COLLISION_RETRY_DELAY: Duration = Duration::from_millis(10);

/// One page of [`UrlService::find_all`] results.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlPage {
    pub data: Vec<ShortUrl>,
    pub meta: PageMeta,
}

/// Pagination metadata.
///
/// `next_page` / `prev_page` are absolute links back to the listing endpoint
/// with the same filter and page size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMeta {
    pub total_count: i64,
    pub current_page: u32,
    pub page_size: u32,
    pub total_pages: i64,
    pub next_page: Option<String>,
    pub prev_page: Option<String>,
}

/// Service owning the short URL lifecycle.
///
/// Short links are `<host>/<code>`; `host` is fixed at construction.
pub struct UrlService<R: ?Sized> {
    repository: Arc<R>,
    host: String,
    code_length: usize,
}

impl<R: UrlRepository + ?Sized> UrlService<R> {
    /// Creates a new service. A trailing `/` on `host` is ignored.
    pub fn new(repository: Arc<R>, host: impl Into<String>) -> Self {
        let host = host.into().trim_end_matches('/').to_string();
        Self {
            repository,
            host,
            code_length: CODE_LENGTH,
        }
    }

    /// Full short link for a code.
    pub fn short_url_for(&self, uid: &str) -> String {
        format!("{}/{}", self.host, uid)
    }

    /// Creates a short link with a freshly generated code.
    ///
    /// A code collision reported by the store is retried with a new code, up
    /// to three attempts in total.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the title is empty or the redirect is not
    ///   an absolute URL
    /// - [`AppError::Conflict`] if every attempt collided
    /// - store errors otherwise
    pub async fn create(&self, input: CreateShortUrl) -> Result<ShortUrl, AppError> {
        input.validate()?;

        let strategy = FixedInterval::new(COLLISION_RETRY_DELAY).take(MAX_CREATE_ATTEMPTS - 1);
        let mut attempt = 0;

        let result = RetryIf::spawn(
            strategy,
            || {
                attempt += 1;
                self.insert_with_new_code(&input, attempt)
            },
            |e: &AppError| e.is_conflict(),
        )
        .await;

        match result {
            Ok(created) => {
                tracing::info!(id = created.id, url = %created.url, "Short URL created");
                Ok(created)
            }
            Err(e) if e.is_conflict() => Err(AppError::conflict(
                "Failed to generate a unique short code",
                json!({ "attempts": MAX_CREATE_ATTEMPTS }),
            )),
            Err(e) => Err(e),
        }
    }

    async fn insert_with_new_code(
        &self,
        input: &CreateShortUrl,
        attempt: usize,
    ) -> Result<ShortUrl, AppError> {
        let code = code_generator::generate(self.code_length)?;

        let new_url = NewShortUrl {
            url: self.short_url_for(&code),
            redirect: input.redirect.clone(),
            title: input.title.clone(),
            description: input.description.clone(),
        };

        let result = self.repository.create(new_url).await;
        if let Err(e) = &result
            && e.is_conflict()
        {
            tracing::warn!(attempt, code = %code, "Short code collision");
        }
        result
    }

    /// Looks up a short link by its code.
    ///
    /// Absence is `Ok(None)`; the caller decides whether that is an error.
    pub async fn find_one(&self, uid: &str) -> Result<Option<ShortUrl>, AppError> {
        self.repository.find_by_url(&self.short_url_for(uid)).await
    }

    /// Lists short links, optionally filtered, one page at a time.
    ///
    /// A non-empty `filter` selects rows whose title, redirect or description
    /// contains it (case-sensitive). `total_count` counts rows matching the same
    /// filter, so `total_pages` and the page links stay consistent with `data`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `page` or `limit` is zero.
    pub async fn find_all(
        &self,
        filter: Option<String>,
        page: u32,
        limit: u32,
    ) -> Result<UrlPage, AppError> {
        if page == 0 {
            return Err(AppError::bad_request(
                "Page must be greater than 0",
                json!({ "page": page }),
            ));
        }
        if limit == 0 {
            return Err(AppError::bad_request(
                "Limit must be greater than 0",
                json!({ "limit": limit }),
            ));
        }

        let search = filter.filter(|f| !f.is_empty());
        let offset = (i64::from(page) - 1) * i64::from(limit);
        let query = UrlQuery::new(offset, i64::from(limit)).with_search(search.clone());

        let (data, total_count) = tokio::try_join!(
            self.repository.find_many(&query),
            self.repository.count(search.clone())
        )?;

        let meta = self.page_meta(search.as_deref(), page, limit, total_count);

        Ok(UrlPage { data, meta })
    }

    fn page_meta(&self, filter: Option<&str>, page: u32, limit: u32, total_count: i64) -> PageMeta {
        let limit_i64 = i64::from(limit);
        let total_pages = if total_count <= 0 {
            0
        } else {
            (total_count + limit_i64 - 1) / limit_i64
        };

        let next_page =
            (i64::from(page) < total_pages).then(|| self.page_link(filter, page + 1, limit));
        let prev_page = (page > 1).then(|| self.page_link(filter, page - 1, limit));

        PageMeta {
            total_count,
            current_page: page,
            page_size: limit,
            total_pages,
            next_page,
            prev_page,
        }
    }

    fn page_link(&self, filter: Option<&str>, page: u32, limit: u32) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query.append_pair("limit", &limit.to_string());
        if let Some(filter) = filter {
            query.append_pair("filter", filter);
        }
        query.append_pair("page", &page.to_string());

        format!("{}/url?{}", self.host, query.finish())
    }

    /// Applies a partial update to the mutable fields of a short link.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if a supplied field is invalid
    /// - [`AppError::NotFound`] if no row has `id`
    pub async fn update(&self, id: i64, patch: ShortUrlPatch) -> Result<ShortUrl, AppError> {
        patch.validate()?;

        let updated = self.repository.update(id, patch).await?;
        tracing::info!(id, url = %updated.url, "Short URL updated");

        Ok(updated)
    }

    /// Deletes a short link and returns the removed row.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no row has `id`.
    pub async fn remove(&self, id: i64) -> Result<ShortUrl, AppError> {
        let removed = self.repository.delete(id).await?;
        tracing::info!(id, url = %removed.url, "Short URL deleted");

        Ok(removed)
    }

    /// Number of stored short links, unfiltered.
    pub async fn total_count(&self) -> Result<i64, AppError> {
        self.repository.count(None).await
    }
}
