#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tunlink::application::services::AuthService;
use tunlink::config::HttpConfig;
use tunlink::infrastructure::cache::{CacheResult, CacheService, NullCache};
use tunlink::infrastructure::persistence::MemoryUrlRepository;
use tunlink::routes::build_router;
use tunlink::state::AppState;

pub const HOST: &str = "https://short.example";
pub const API_KEY: &str = "test-api-key";

/// Cache kept in a map so tests can look at what handlers stored or evicted.
#[derive(Default)]
pub struct MapCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MapCache {
    pub fn get(&self, uid: &str) -> Option<String> {
        self.entries.lock().unwrap().get(uid).cloned()
    }

    pub fn insert(&self, uid: &str, redirect: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(uid.to_string(), redirect.to_string());
    }
}

#[async_trait]
impl CacheService for MapCache {
    async fn get_redirect(&self, uid: &str) -> CacheResult<Option<String>> {
        Ok(self.get(uid))
    }

    async fn set_redirect(
        &self,
        uid: &str,
        redirect: &str,
        _ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        self.insert(uid, redirect);
        Ok(())
    }

    async fn invalidate(&self, uid: &str) -> CacheResult<()> {
        self.entries.lock().unwrap().remove(uid);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "map"
    }
}

/// Map cache whose writes take a while to land.
#[derive(Default)]
pub struct SlowWriteCache {
    pub inner: MapCache,
}

#[async_trait]
impl CacheService for SlowWriteCache {
    async fn get_redirect(&self, uid: &str) -> CacheResult<Option<String>> {
        self.inner.get_redirect(uid).await
    }

    async fn set_redirect(
        &self,
        uid: &str,
        redirect: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        self.inner.set_redirect(uid, redirect, ttl_seconds).await
    }

    async fn invalidate(&self, uid: &str) -> CacheResult<()> {
        self.inner.invalidate(uid).await
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "slow"
    }
}

/// Cache whose backend is always down.
pub struct DownCache;

#[async_trait]
impl CacheService for DownCache {
    async fn get_redirect(&self, _uid: &str) -> CacheResult<Option<String>> {
        Ok(None)
    }

    async fn set_redirect(
        &self,
        _uid: &str,
        _redirect: &str,
        _ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        Ok(())
    }

    async fn invalidate(&self, _uid: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        false
    }

    fn backend(&self) -> &'static str {
        "down"
    }
}

pub fn create_test_state(cache: Arc<dyn CacheService>) -> AppState {
    let repository = Arc::new(MemoryUrlRepository::new());
    let auth_service = AuthService::new(API_KEY).unwrap();

    AppState::new(repository, cache, HOST, auth_service)
}

pub fn make_server() -> TestServer {
    make_server_with_cache(Arc::new(NullCache::new()))
}

pub fn make_server_with_cache(cache: Arc<dyn CacheService>) -> TestServer {
    make_server_with(cache, &HttpConfig::default())
}

pub fn make_server_with(cache: Arc<dyn CacheService>, http: &HttpConfig) -> TestServer {
    TestServer::new(build_router(create_test_state(cache), http).unwrap()).unwrap()
}

/// Creates a short link through the API and returns the `data` object.
pub async fn create_url(
    server: &TestServer,
    title: &str,
    redirect: &str,
    description: Option<&str>,
) -> Value {
    let response = server
        .post("/url")
        .add_header("x-api-key", API_KEY)
        .json(&json!({
            "title": title,
            "redirect": redirect,
            "description": description,
        }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()["data"].clone()
}

/// Seeds Google, Facebook and Twitter in that order.
pub async fn seed_three(server: &TestServer) -> Vec<Value> {
    vec![
        create_url(server, "Google", "https://google.com", Some("Search engine")).await,
        create_url(server, "Facebook", "https://facebook.com", None).await,
        create_url(server, "Twitter", "https://twitter.com", Some("Microblogging")).await,
    ]
}

/// Short code of a created link: the part of `url` after `{HOST}/`.
pub fn uid_of(data: &Value) -> String {
    data["url"]
        .as_str()
        .unwrap()
        .strip_prefix(&format!("{HOST}/"))
        .unwrap()
        .to_string()
}
