mod common;

use axum::http::StatusCode;
use common::{
    API_KEY, MapCache, SlowWriteCache, create_url, make_server, make_server_with_cache, uid_of,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tunlink::infrastructure::cache::CacheService;

#[tokio::test]
async fn test_redirect_success() {
    let server = make_server();
    let created = create_url(&server, "Google", "https://google.com", None).await;

    let response = server.get(&format!("/{}", uid_of(&created))).await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.header("location"), "https://google.com");
}

#[tokio::test]
async fn test_redirect_needs_no_api_key() {
    let server = make_server();
    let created = create_url(&server, "Google", "https://google.com", None).await;

    let response = server
        .get(&format!("/{}", uid_of(&created)))
        .add_header("x-api-key", "whatever")
        .await;

    response.assert_status(StatusCode::FOUND);
}

#[tokio::test]
async fn test_redirect_not_found() {
    let server = make_server();

    let response = server.get("/notfound").await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_redirect_served_from_cache() {
    let cache = Arc::new(MapCache::default());
    cache.insert("cached0001", "https://cached.example");
    let server = make_server_with_cache(cache.clone());

    let response = server.get("/cached0001").await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.header("location"), "https://cached.example");
}

#[tokio::test]
async fn test_redirect_populates_cache() {
    let cache = Arc::new(MapCache::default());
    let server = make_server_with_cache(cache.clone());
    let created = create_url(&server, "Google", "https://google.com", None).await;
    let uid = uid_of(&created);

    server.get(&format!("/{uid}")).await.assert_status(StatusCode::FOUND);

    assert_eq!(cache.get(&uid).as_deref(), Some("https://google.com"));
}

#[tokio::test]
async fn test_deleted_link_stays_gone_with_slow_cache_writes() {
    let cache = Arc::new(SlowWriteCache::default());
    let server = make_server_with_cache(cache.clone());
    let created = create_url(&server, "Google", "https://google.com", None).await;
    let uid = uid_of(&created);

    server.get(&format!("/{uid}")).await.assert_status(StatusCode::FOUND);

    server
        .delete(&format!("/url/{uid}"))
        .add_header("x-api-key", API_KEY)
        .await
        .assert_status_ok();

    tokio::time::sleep(Duration::from_millis(150)).await;

    assert!(cache.inner.get(&uid).is_none());
    server.get(&format!("/{uid}")).await.assert_status_not_found();
}

#[tokio::test]
async fn test_updated_link_not_served_stale_with_slow_cache_writes() {
    let cache = Arc::new(SlowWriteCache::default());
    let server = make_server_with_cache(cache.clone());
    let created = create_url(&server, "Google", "https://google.com", None).await;
    let uid = uid_of(&created);

    server.get(&format!("/{uid}")).await.assert_status(StatusCode::FOUND);

    server
        .patch(&format!("/url/{uid}"))
        .add_header("x-api-key", API_KEY)
        .json(&json!({ "redirect": "https://duckduckgo.com" }))
        .await
        .assert_status_ok();

    tokio::time::sleep(Duration::from_millis(150)).await;

    let response = server.get(&format!("/{uid}")).await;
    assert_eq!(response.header("location"), "https://duckduckgo.com");
}

#[tokio::test]
async fn test_update_invalidates_cached_redirect() {
    let cache = Arc::new(MapCache::default());
    let server = make_server_with_cache(cache.clone());
    let created = create_url(&server, "Google", "https://google.com", None).await;
    let uid = uid_of(&created);
    cache.insert(&uid, "https://google.com");

    server
        .patch(&format!("/url/{uid}"))
        .add_header("x-api-key", API_KEY)
        .json(&json!({ "redirect": "https://duckduckgo.com" }))
        .await
        .assert_status_ok();

    assert!(cache.get_redirect(&uid).await.unwrap().is_none());

    let response = server.get(&format!("/{uid}")).await;
    assert_eq!(response.header("location"), "https://duckduckgo.com");
}

#[tokio::test]
async fn test_delete_invalidates_cached_redirect() {
    let cache = Arc::new(MapCache::default());
    let server = make_server_with_cache(cache.clone());
    let created = create_url(&server, "Google", "https://google.com", None).await;
    let uid = uid_of(&created);
    cache.insert(&uid, "https://google.com");

    server
        .delete(&format!("/url/{uid}"))
        .add_header("x-api-key", API_KEY)
        .await
        .assert_status_ok();

    assert!(cache.get(&uid).is_none());
    server.get(&format!("/{uid}")).await.assert_status_not_found();
}
