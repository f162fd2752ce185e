//! Infrastructure layer for external integrations.
//!
//! # Modules
//!
//! - [`cache`] - Redirect lookup cache (Redis and no-op implementations)
//! - [`persistence`] - Repository implementations

pub mod cache;
pub mod persistence;
