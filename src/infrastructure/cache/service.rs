//! Cache service trait and error types.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache of `uid -> redirect target` mappings.
///
/// Only redirect lookups go through the cache; creation never does, so the
/// store stays the sole arbiter of short link uniqueness. Implementations must
/// be fail-open: a broken cache degrades to store lookups.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Returns the cached redirect target for `uid`.
    ///
    /// `Ok(None)` on a miss. Production implementations log backend errors and
    /// report them as misses.
    async fn get_redirect(&self, uid: &str) -> CacheResult<Option<String>>;

    /// Stores a redirect target.
    ///
    /// `ttl_seconds = None` uses the implementation default.
    async fn set_redirect(
        &self,
        uid: &str,
        redirect: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()>;

    /// Removes a cached mapping. Called after a link is updated or deleted.
    async fn invalidate(&self, uid: &str) -> CacheResult<()>;

    /// Checks if the cache backend is reachable.
    async fn health_check(&self) -> bool;

    /// Human readable backend name for health reports.
    fn backend(&self) -> &'static str;
}
