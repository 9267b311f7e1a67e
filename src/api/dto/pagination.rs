//! Pagination query parameters for link listing.

use serde::{Deserialize, Serialize};
use serde_with::{DefaultOnError, DisplayFromStr, NoneAsEmptyString, serde_as};

use crate::api::dto::link::LinkResponse;
use crate::application::services::link_service::{DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT};
use crate::domain::entities::LinkPage;

/// Query for `GET /api/v1/links/all`.
///
/// Uses `serde_with` so a non-numeric `page` or `limit` reads as absent
/// instead of rejecting the request.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct ListLinksQuery {
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub user_id: Option<String>,

    #[serde_as(as = "DefaultOnError<Option<DisplayFromStr>>")]
    #[serde(default)]
    pub page: Option<i64>,

    #[serde_as(as = "DefaultOnError<Option<DisplayFromStr>>")]
    #[serde(default)]
    pub limit: Option<i64>,
}

impl ListLinksQuery {
    /// Resolves `(page, limit)`.
    ///
    /// # Defaults
    ///
    /// - `page`: 1
    /// - `limit`: 10, at most 100
    ///
    /// Absent, unparsable and non-positive values fall back to the default.
    pub fn page_and_limit(&self) -> (i64, i64) {
        let page = self.page.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE);
        let limit = self
            .limit
            .filter(|l| *l > 0)
            .map_or(DEFAULT_LIMIT, |l| l.min(MAX_LIMIT));
        (page, limit)
    }
}

/// One page of an owner's links.
#[derive(Debug, Serialize)]
pub struct LinkPageResponse {
    pub links: Vec<LinkResponse>,
    pub total_pages: i64,
    pub total_links: i64,
    pub page: i64,
    pub limit: i64,
}

impl From<LinkPage> for LinkPageResponse {
    fn from(page: LinkPage) -> Self {
        Self {
            links: page.links.into_iter().map(LinkResponse::from).collect(),
            total_pages: page.total_pages,
            total_links: page.total_links,
            page: page.page,
            limit: page.limit,
        }
    }
}
