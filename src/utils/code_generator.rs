//! Short code generation.
//!
//! Codes are lowercase hex drawn from the operating system CSPRNG, so they are
//! URL-safe and not predictable.

use crate::error::AppError;
use serde_json::json;

/// Length used when the caller has no preference.
pub const DEFAULT_CODE_LENGTH: usize = 21;

/// Generates a random hex code of exactly `length` characters.
///
/// Draws `ceil(length / 2)` random bytes, hex-encodes them and truncates the
/// result to `length`.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if `length` is zero and
/// [`AppError::Internal`] if the system random source fails.
///
/// # Examples
///
/// ```ignore
/// let code = generate(10)?;
/// assert_eq!(code.len(), 10);
/// assert!(code.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
pub fn generate(length: usize) -> Result<String, AppError> {
    if length == 0 {
        return Err(AppError::bad_request(
            "Code length must be positive",
            json!({ "length": length }),
        ));
    }

    let mut buffer = vec![0u8; length.div_ceil(2)];
    getrandom::fill(&mut buffer).map_err(|e| {
        AppError::internal(
            "Failed to generate random bytes",
            json!({ "reason": e.to_string() }),
        )
    })?;

    let mut code = hex::encode(buffer);
    code.truncate(length);
    Ok(code)
}

/// Generates a code of [`DEFAULT_CODE_LENGTH`] characters.
pub fn generate_default() -> Result<String, AppError> {
    generate(DEFAULT_CODE_LENGTH)
}
