//! Utility functions shared across layers.
//!
//! - [`code_generator`] - Short code generation
//! - [`masking`] - Redaction of secrets in log output

pub mod code_generator;
pub mod masking;
