//! In-process implementation of the short URL repository.
//!
//! Mirrors the PostgreSQL semantics (unique `url`, `id` ordering, substring
//! search, physical deletes) so HTTP handlers can be exercised without a
//! database.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::domain::entities::{NewShortUrl, ShortUrl, ShortUrlPatch};
use crate::domain::repositories::url_repository::matches_search;
use crate::domain::repositories::{UrlQuery, UrlRepository};
use crate::error::AppError;

#[derive(Default)]
struct Table {
    rows: BTreeMap<i64, ShortUrl>,
    next_id: i64,
}

/// Short URL storage kept in memory, keyed and ordered by `id`.
#[derive(Default)]
pub struct MemoryUrlRepository {
    table: RwLock<Table>,
}

impl MemoryUrlRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(id: i64) -> AppError {
    AppError::not_found("Short URL not found", json!({ "id": id }))
}

#[async_trait]
impl UrlRepository for MemoryUrlRepository {
    async fn create(&self, new_url: NewShortUrl) -> Result<ShortUrl, AppError> {
        let mut table = self.table.write().await;

        if table.rows.values().any(|row| row.url == new_url.url) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "urls_url_key" }),
            ));
        }

        table.next_id += 1;
        let now = Utc::now();
        let row = ShortUrl {
            id: table.next_id,
            url: new_url.url,
            redirect: new_url.redirect,
            title: new_url.title,
            description: new_url.description,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(row.id, row.clone());

        Ok(row)
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<ShortUrl>, AppError> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|row| row.url == url).cloned())
    }

    async fn find_many(&self, query: &UrlQuery) -> Result<Vec<ShortUrl>, AppError> {
        let table = self.table.read().await;
        let offset = usize::try_from(query.offset).unwrap_or(0);
        let limit = usize::try_from(query.limit).unwrap_or(0);

        Ok(table
            .rows
            .values()
            .filter(|row| query.matches(row))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&self, search: Option<String>) -> Result<i64, AppError> {
        let table = self.table.read().await;
        let count = table
            .rows
            .values()
            .filter(|row| matches_search(search.as_deref(), row))
            .count();

        Ok(count as i64)
    }

    async fn update(&self, id: i64, patch: ShortUrlPatch) -> Result<ShortUrl, AppError> {
        let mut table = self.table.write().await;
        let row = table.rows.get_mut(&id).ok_or_else(|| not_found(id))?;

        if let Some(title) = patch.title {
            row.title = title;
        }
        if let Some(redirect) = patch.redirect {
            row.redirect = redirect;
        }
        if let Some(description) = patch.description {
            row.description = description;
        }
        row.updated_at = Utc::now();

        Ok(row.clone())
    }

    async fn delete(&self, id: i64) -> Result<ShortUrl, AppError> {
        let mut table = self.table.write().await;
        table.rows.remove(&id).ok_or_else(|| not_found(id))
    }
}
