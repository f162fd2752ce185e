//! Repository trait for short URL data access.

use crate::domain::entities::{NewShortUrl, ShortUrl, ShortUrlPatch};
use crate::error::AppError;
use async_trait::async_trait;

/// Listing parameters for [`UrlRepository::find_many`].
///
/// `search` is a case-sensitive substring matched against `title`, `redirect`
/// and `description`. `None` selects every row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlQuery {
    pub search: Option<String>,
    pub offset: i64,
    pub limit: i64,
}

impl UrlQuery {
    pub fn new(offset: i64, limit: i64) -> Self {
        Self {
            search: None,
            offset,
            limit,
        }
    }

    /// Sets the substring filter. Empty strings are treated as no filter.
    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = search.filter(|s| !s.is_empty());
        self
    }

    /// Returns true if `url` matches the substring filter.
    pub fn matches(&self, url: &ShortUrl) -> bool {
        matches_search(self.search.as_deref(), url)
    }
}

/// Substring predicate shared by listing and counting.
pub fn matches_search(search: Option<&str>, url: &ShortUrl) -> bool {
    match search {
        None | Some("") => true,
        Some(s) => {
            url.title.contains(s)
                || url.redirect.contains(s)
                || url.description.as_deref().is_some_and(|d| d.contains(s))
        }
    }
}

/// Storage for short URLs.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL
/// - [`crate::infrastructure::persistence::MemoryUrlRepository`] - in-process, for tests
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Inserts a new row.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if `url` already exists.
    async fn create(&self, new_url: NewShortUrl) -> Result<ShortUrl, AppError>;

    /// Finds a row by its full short link.
    async fn find_by_url(&self, url: &str) -> Result<Option<ShortUrl>, AppError>;

    /// Lists rows matching `query.search`, ordered by `id` ascending.
    async fn find_many(&self, query: &UrlQuery) -> Result<Vec<ShortUrl>, AppError>;

    /// Counts rows matching `search` (all rows when `None`).
    async fn count(&self, search: Option<String>) -> Result<i64, AppError>;

    /// Applies a partial update and refreshes `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no row has `id`.
    async fn update(&self, id: i64, patch: ShortUrlPatch) -> Result<ShortUrl, AppError>;

    /// Physically deletes a row and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no row has `id`.
    async fn delete(&self, id: i64) -> Result<ShortUrl, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn row(title: &str, redirect: &str, description: Option<&str>) -> ShortUrl {
        let now = Utc::now();
        ShortUrl {
            id: 1,
            url: "https://short.example/abc".to_string(),
            redirect: redirect.to_string(),
            title: title.to_string(),
            description: description.map(str::to_string),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_empty_search_is_dropped() {
        let query = UrlQuery::new(0, 10).with_search(Some(String::new()));
        assert!(query.search.is_none());
    }

    #[test]
    fn test_matches_any_text_field() {
        let url = row("Google", "https://google.com", Some("A search engine"));

        assert!(matches_search(Some("Goo"), &url));
        assert!(matches_search(Some("google.com"), &url));
        assert!(matches_search(Some("search"), &url));
        assert!(matches_search(None, &url));
        assert!(!matches_search(Some("Twitter"), &url));
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let url = row("Google", "https://google.com", None);
        assert!(!matches_search(Some("GOOGLE"), &url));
    }

    #[test]
    fn test_missing_description_never_matches() {
        let url = row("Facebook", "https://facebook.com", None);
        assert!(!matches_search(Some("engine"), &url));
    }
}
