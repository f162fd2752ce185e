//! Short URL entity and its creation/update inputs.

use chrono::{DateTime, Utc};
use serde_json::json;
use url::Url;

use crate::error::AppError;

/// A persisted short link.
///
/// `url` is the full short link (`<host>/<code>`) and is unique across all rows.
/// `id` and `url` never change after insert; only `title`, `redirect` and
/// `description` are mutable.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortUrl {
    pub id: i64,
    pub url: String,
    pub redirect: String,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ShortUrl {
    /// Returns the generated code, i.e. the last path segment of `url`.
    pub fn uid(&self) -> &str {
        self.url.rsplit('/').next().unwrap_or_default()
    }
}

/// Validated input for [`crate::application::services::UrlService::create`].
#[derive(Debug, Clone, PartialEq)]
pub struct CreateShortUrl {
    pub title: String,
    pub redirect: String,
    pub description: Option<String>,
}

impl CreateShortUrl {
    /// Checks that `title` is non-empty and `redirect` is an absolute URL.
    pub fn validate(&self) -> Result<(), AppError> {
        validate_title(&self.title)?;
        validate_redirect(&self.redirect)
    }
}

/// Row to insert. Built by the service once the code has been generated.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShortUrl {
    pub url: String,
    pub redirect: String,
    pub title: String,
    pub description: Option<String>,
}

/// Partial update of the mutable fields.
///
/// `None` leaves a field unchanged. `description: Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShortUrlPatch {
    pub title: Option<String>,
    pub redirect: Option<String>,
    pub description: Option<Option<String>>,
}

impl ShortUrlPatch {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(redirect) = &self.redirect {
            validate_redirect(redirect)?;
        }
        Ok(())
    }
}

fn validate_title(title: &str) -> Result<(), AppError> {
    if title.trim().is_empty() {
        return Err(AppError::bad_request(
            "Title must not be empty",
            json!({ "field": "title" }),
        ));
    }
    Ok(())
}

fn validate_redirect(redirect: &str) -> Result<(), AppError> {
    // The URL parser drops tabs and newlines silently, but the raw string is
    // what gets stored and sent back as `Location`.
    if redirect.chars().any(|c| c.is_control() || c.is_whitespace()) {
        return Err(AppError::bad_request(
            "Redirect must be an absolute URL",
            json!({ "field": "redirect", "reason": "contains whitespace or control characters" }),
        ));
    }

    let parsed = Url::parse(redirect).map_err(|e| {
        AppError::bad_request(
            "Redirect must be an absolute URL",
            json!({ "field": "redirect", "reason": e.to_string() }),
        )
    })?;

    if !parsed.has_host() {
        return Err(AppError::bad_request(
            "Redirect must be an absolute URL",
            json!({ "field": "redirect", "reason": "missing host" }),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str, redirect: &str) -> CreateShortUrl {
        CreateShortUrl {
            title: title.to_string(),
            redirect: redirect.to_string(),
            description: None,
        }
    }

    #[test]
    fn test_uid_is_last_segment() {
        let now = Utc::now();
        let short_url = ShortUrl {
            id: 1,
            url: "https://short.example/a1b2c3d4e5".to_string(),
            redirect: "https://google.com".to_string(),
            title: "Google".to_string(),
            description: None,
            created_at: now,
            updated_at: now,
        };

        assert_eq!(short_url.uid(), "a1b2c3d4e5");
    }

    #[test]
    fn test_valid_input() {
        assert!(input("Google", "https://google.com").validate().is_ok());
        assert!(input("Docs", "http://localhost:8080/path?q=1").validate().is_ok());
    }

    #[test]
    fn test_empty_title_rejected() {
        let err = input("   ", "https://google.com").validate().unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[test]
    fn test_relative_redirect_rejected() {
        assert!(input("Google", "google.com").validate().is_err());
        assert!(input("Google", "/relative/path").validate().is_err());
        assert!(input("Google", "").validate().is_err());
    }

    #[test]
    fn test_redirect_without_host_rejected() {
        assert!(input("Mail", "mailto:someone@example.com").validate().is_err());
    }

    #[test]
    fn test_patch_validates_only_present_fields() {
        let patch = ShortUrlPatch {
            title: Some("New title".to_string()),
            ..Default::default()
        };
        assert!(patch.validate().is_ok());

        let bad = ShortUrlPatch {
            redirect: Some("nope".to_string()),
            ..Default::default()
        };
        assert!(bad.validate().is_err());

        assert!(ShortUrlPatch::default().validate().is_ok());
    }

    #[test]
    fn test_redirect_with_embedded_whitespace_rejected() {
        for redirect in [
            "https://example.com/a\nb",
            "https://example.com/a\tb",
            "https://example.com/a\r\nb",
            " https://example.com",
            "https://example.com/a b",
        ] {
            let err = input("Example", redirect).validate().unwrap_err();
            assert!(matches!(err, AppError::Validation { .. }), "{redirect:?}");
        }

        let patch = ShortUrlPatch {
            redirect: Some("https://example.com/a\nb".to_string()),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }
}
