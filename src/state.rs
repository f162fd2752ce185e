//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{AuthService, UrlService};
use crate::domain::repositories::UrlRepository;
use crate::infrastructure::cache::CacheService;

/// Services shared by all requests.
///
/// Built once at startup; nothing in here is mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub url_service: Arc<UrlService<dyn UrlRepository>>,
    pub auth_service: Arc<AuthService>,
    pub cache: Arc<dyn CacheService>,
}

impl AppState {
    /// Wires the services around a repository and cache.
    pub fn new(
        repository: Arc<dyn UrlRepository>,
        cache: Arc<dyn CacheService>,
        host: &str,
        auth_service: AuthService,
    ) -> Self {
        Self {
            url_service: Arc::new(UrlService::new(repository, host)),
            auth_service: Arc::new(auth_service),
            cache,
        }
    }
}
