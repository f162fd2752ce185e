//! PostgreSQL implementation of the short URL repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{NewShortUrl, ShortUrl, ShortUrlPatch};
use crate::domain::repositories::{UrlQuery, UrlRepository};
use crate::error::AppError;

const COLUMNS: &str = "id, url, redirect, title, description, created_at, updated_at";

/// Substring filter over the three text columns. `$1` is the search term or NULL.
///
/// `strpos` is used instead of `LIKE` so `%` and `_` in user input match literally.
const SEARCH_PREDICATE: &str = "($1::text IS NULL \
     OR strpos(title, $1) > 0 \
     OR strpos(redirect, $1) > 0 \
     OR COALESCE(strpos(description, $1), 0) > 0)";

#[derive(Debug, FromRow)]
struct UrlRow {
    id: i64,
    url: String,
    redirect: String,
    title: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UrlRow> for ShortUrl {
    fn from(row: UrlRow) -> Self {
        Self {
            id: row.id,
            url: row.url,
            redirect: row.redirect,
            title: row.title,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL repository for short URLs.
///
/// All statements are parameterized; the `urls_url_key` unique constraint
/// arbitrates concurrent inserts of the same short link.
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

fn not_found(id: i64) -> AppError {
    AppError::not_found("Short URL not found", json!({ "id": id }))
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn create(&self, new_url: NewShortUrl) -> Result<ShortUrl, AppError> {
        let sql = format!(
            "INSERT INTO urls (url, redirect, title, description) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );

        let row = sqlx::query_as::<_, UrlRow>(&sql)
            .bind(new_url.url)
            .bind(new_url.redirect)
            .bind(new_url.title)
            .bind(new_url.description)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(row.into())
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<ShortUrl>, AppError> {
        let sql = format!("SELECT {COLUMNS} FROM urls WHERE url = $1");

        let row = sqlx::query_as::<_, UrlRow>(&sql)
            .bind(url)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn find_many(&self, query: &UrlQuery) -> Result<Vec<ShortUrl>, AppError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM urls \
             WHERE {SEARCH_PREDICATE} \
             ORDER BY id ASC \
             LIMIT $2 OFFSET $3"
        );

        let rows = sqlx::query_as::<_, UrlRow>(&sql)
            .bind(query.search.as_deref())
            .bind(query.limit)
            .bind(query.offset)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count(&self, search: Option<String>) -> Result<i64, AppError> {
        let sql = format!("SELECT COUNT(*) FROM urls WHERE {SEARCH_PREDICATE}");

        let count: i64 = sqlx::query_scalar(&sql)
            .bind(search)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn update(&self, id: i64, patch: ShortUrlPatch) -> Result<ShortUrl, AppError> {
        let (set_description, description) = match patch.description {
            Some(description) => (true, description),
            None => (false, None),
        };

        let sql = format!(
            "UPDATE urls SET \
                 title = COALESCE($2, title), \
                 redirect = COALESCE($3, redirect), \
                 description = CASE WHEN $4 THEN $5 ELSE description END, \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );

        let row = sqlx::query_as::<_, UrlRow>(&sql)
            .bind(id)
            .bind(patch.title)
            .bind(patch.redirect)
            .bind(set_description)
            .bind(description)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(Into::into).ok_or_else(|| not_found(id))
    }

    async fn delete(&self, id: i64) -> Result<ShortUrl, AppError> {
        let sql = format!("DELETE FROM urls WHERE id = $1 RETURNING {COLUMNS}");

        let row = sqlx::query_as::<_, UrlRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(Into::into).ok_or_else(|| not_found(id))
    }
}
