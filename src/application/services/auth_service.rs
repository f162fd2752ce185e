//! API key authentication.

use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Fixed MAC key. Both sides of the comparison are MAC'd with it so that the
/// final check runs over equal-length tags in constant time.
const COMPARISON_KEY: &[u8] = b"tunlink/api-key-comparison";

/// Checks request-supplied API keys against the configured key.
///
/// The expected key is set once at startup and never changes. Only its MAC is
/// kept in memory.
pub struct AuthService {
    expected_tag: Vec<u8>,
}

impl AuthService {
    /// Creates the service from the configured API key.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if `api_key` is empty. An empty key would
    /// make every request with an empty header look authorized.
    pub fn new(api_key: &str) -> Result<Self, AppError> {
        if api_key.is_empty() {
            return Err(AppError::internal(
                "API key must not be empty",
                json!({ "setting": "API_KEY" }),
            ));
        }

        Ok(Self {
            expected_tag: Self::mac(api_key).finalize().into_bytes().to_vec(),
        })
    }

    fn mac(value: &str) -> HmacSha256 {
        let mut mac =
            HmacSha256::new_from_slice(COMPARISON_KEY).expect("HMAC accepts any key length");
        mac.update(value.as_bytes());
        mac
    }

    /// Authorizes a request.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] with reason `missing` when no key was
    /// supplied, and with reason `invalid` when the key does not match exactly.
    pub fn check(&self, provided: Option<&str>) -> Result<(), AppError> {
        let provided = match provided {
            Some(key) if !key.is_empty() => key,
            _ => {
                return Err(AppError::unauthorized(
                    "API key is missing",
                    json!({ "reason": "missing" }),
                ));
            }
        };

        Self::mac(provided)
            .verify_slice(&self.expected_tag)
            .map_err(|_| {
                tracing::debug!("Rejected request with invalid API key");
                AppError::unauthorized("Invalid API key", json!({ "reason": "invalid" }))
            })
    }
}
