//! Application layer services implementing business logic.
//!
//! Services consume repository traits and expose a small API for HTTP handlers
//! and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::url_service::UrlService`] - Short URL lifecycle and listing
//! - [`services::auth_service::AuthService`] - API key authentication

pub mod services;
