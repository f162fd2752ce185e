//! HTTP middleware for request processing and protection.
//!
//! Provides API key authentication, CORS, security headers and request tracing.

pub mod auth;
pub mod cors;
pub mod security_headers;
pub mod tracing;
