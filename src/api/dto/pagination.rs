//! Query parameters for the listing endpoint.

use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};

use crate::application::services::url_service::{DEFAULT_LIMIT, DEFAULT_PAGE};

/// Query string of `GET /url`.
///
/// Uses `serde_with` to parse numbers from query strings.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct ListUrlsParams {
    /// Substring matched against title, redirect and description.
    #[serde(default)]
    pub filter: Option<String>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<u32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub limit: Option<u32>,
}

impl ListUrlsParams {
    /// Page number, defaulting to 1.
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(DEFAULT_PAGE)
    }

    /// Page size, defaulting to 10.
    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }
}
