//! Core domain entities.
//!
//! Entities are plain data structures. Creation and partial updates use
//! separate input types:
//! - [`CreateShortUrl`] - validated user input for a new link
//! - [`NewShortUrl`] - the row handed to the store once a code is generated
//! - [`ShortUrlPatch`] - partial update of mutable fields

pub mod short_url;

pub use short_url::{CreateShortUrl, NewShortUrl, ShortUrl, ShortUrlPatch};
