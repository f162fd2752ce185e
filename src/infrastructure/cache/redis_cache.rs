//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, error, info, warn};

const KEY_PREFIX: &str = "url:";

/// Redis cache for redirect lookups.
///
/// Uses `ConnectionManager` for connection reuse and reconnects. All
/// operations are fail-open: errors are logged but don't propagate to callers.
pub struct RedisCache {
    client: ConnectionManager,
    default_ttl: u64,
}

impl RedisCache {
    /// Connects to Redis, validates the connection with a PING, and configures the default TTL.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    /// - `default_ttl_seconds` - TTL applied when [`CacheService::set_redirect`]
    ///   is called with `ttl_seconds = None`; controlled via `CACHE_TTL_SECONDS`
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str, default_ttl_seconds: u64) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis");

        Ok(Self {
            client: manager,
            default_ttl: default_ttl_seconds,
        })
    }

    fn build_key(uid: &str) -> String {
        format!("{KEY_PREFIX}{uid}")
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_redirect(&self, uid: &str) -> CacheResult<Option<String>> {
        let key = Self::build_key(uid);
        let mut conn = self.client.clone();

        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(redirect)) => {
                debug!(uid, "Cache HIT");
                Ok(Some(redirect))
            }
            Ok(None) => {
                debug!(uid, "Cache MISS");
                Ok(None)
            }
            Err(e) => {
                error!(uid, error = %e, "Redis GET failed");
                Ok(None)
            }
        }
    }

    async fn set_redirect(
        &self,
        uid: &str,
        redirect: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        let key = Self::build_key(uid);
        let mut conn = self.client.clone();
        let ttl = ttl_seconds.unwrap_or(self.default_ttl);

        if let Err(e) = conn.set_ex::<_, _, ()>(&key, redirect, ttl).await {
            warn!(uid, error = %e, "Redis SET failed");
        } else {
            debug!(uid, ttl, "Cache SET");
        }

        Ok(())
    }

    async fn invalidate(&self, uid: &str) -> CacheResult<()> {
        let key = Self::build_key(uid);
        let mut conn = self.client.clone();

        match conn.del::<_, i32>(&key).await {
            Ok(deleted) if deleted > 0 => debug!(uid, "Cache INVALIDATE"),
            Ok(_) => {}
            Err(e) => warn!(uid, error = %e, "Redis DEL failed"),
        }

        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_key_is_namespaced() {
        assert_eq!(RedisCache::build_key("a1b2c3"), "url:a1b2c3");
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_url() {
        let result = RedisCache::connect("not-a-redis-url", 10).await;
        assert!(matches!(result, Err(CacheError::ConnectionError(_))));
    }
}
