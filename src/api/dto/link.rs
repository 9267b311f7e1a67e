//! DTOs for link endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{NoneAsEmptyString, serde_as};
use validator::Validate;

use crate::domain::entities::Link;

/// Request to create a short link.
///
/// ```json
/// { "url": "https://example.com", "user_id": "optional", "hash": "optional" }
/// ```
#[serde_as]
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "URL is required"))]
    pub url: String,

    /// Existing owner id; a fresh one is generated when absent.
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub user_id: Option<String>,

    /// Custom hash; a random one is generated when absent. Its format is
    /// checked by the service.
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub hash: Option<String>,
}

/// Request to delete a link.
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct DeleteLinkRequest {
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub hash: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Query for fetching a single owned link.
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct LinkQuery {
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub user_id: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub hash: Option<String>,
}

/// JSON representation of a link.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    pub url: String,
    pub hash: String,
    pub user_id: String,
    pub number_of_clicks: i64,
    pub lifetime: i64,
}

impl From<Link> for LinkResponse {
    fn from(link: Link) -> Self {
        Self {
            id: link.id,
            created_at: link.created_at,
            updated_at: link.updated_at,
            deleted_at: link.deleted_at,
            url: link.url,
            hash: link.hash,
            user_id: link.owner_id,
            number_of_clicks: link.click_count,
            lifetime: link.remaining_lifetime,
        }
    }
}

/// Plain confirmation message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
