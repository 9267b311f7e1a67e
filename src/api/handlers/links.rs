//! Handlers for link management endpoints (create, fetch, list, delete).

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::json;
use tracing::info;
use validator::Validate;

use crate::api::dto::link::{
    CreateLinkRequest, DeleteLinkRequest, LinkQuery, LinkResponse, MessageResponse,
};
use crate::api::dto::pagination::{LinkPageResponse, ListLinksQuery};
use crate::application::services::CreateLink;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/v1/links`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com",
///   "user_id": "existing-owner-id",  // optional
///   "hash": "my-link"                // optional
/// }
/// ```
///
/// # Errors
///
/// - 400 for a malformed body, URL or hash
/// - 404 if `user_id` does not own any live link
/// - 409 if `hash` is held by a live link
pub async fn create_link_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateLinkRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let link = state
        .link_service
        .create_link(CreateLink {
            url: payload.url,
            owner_id: payload.user_id,
            hash: payload.hash,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(LinkResponse::from(link))))
}

/// Fetches one of the caller's links.
///
/// # Endpoint
///
/// `GET /api/v1/links?user_id=...&hash=...`
///
/// # Errors
///
/// - 400 if either parameter is missing
/// - 403 if the caller owns no live link with this hash
pub async fn get_link_handler(
    State(state): State<AppState>,
    Query(query): Query<LinkQuery>,
) -> Result<Json<LinkResponse>, AppError> {
    let (Some(user_id), Some(hash)) = (query.user_id, query.hash) else {
        return Err(AppError::bad_request(
            "Missing required parameters",
            json!({ "required": ["user_id", "hash"] }),
        ));
    };

    let link = state.link_service.get_link(&hash, Some(&user_id)).await?;

    Ok(Json(LinkResponse::from(link)))
}

/// Lists the caller's links, newest first.
///
/// # Endpoint
///
/// `GET /api/v1/links/all?user_id=...&page=1&limit=10`
///
/// A missing or unknown `user_id` yields an empty page, never an error.
pub async fn list_links_handler(
    State(state): State<AppState>,
    Query(query): Query<ListLinksQuery>,
) -> Result<Json<LinkPageResponse>, AppError> {
    let (page, limit) = query.page_and_limit();

    let links = state
        .link_service
        .list_links(query.user_id.as_deref(), page, limit)
        .await?;

    Ok(Json(LinkPageResponse::from(links)))
}

/// Soft-deletes one of the caller's links.
///
/// # Endpoint
///
/// `DELETE /api/v1/links`
///
/// # Request Body
///
/// ```json
/// { "hash": "abc", "user_id": "owner-id" }
/// ```
///
/// # Errors
///
/// - 400 if either field is missing
/// - 403 if the link is not the caller's
/// - 404 if the caller's link is already deleted
pub async fn delete_link_handler(
    State(state): State<AppState>,
    payload: Result<Json<DeleteLinkRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Json(payload) = payload?;

    let hash = payload.hash.unwrap_or_default();
    let user_id = payload.user_id.unwrap_or_default();

    state.link_service.delete_link(&hash, &user_id).await?;

    info!(hash = %hash, user_id = %user_id, "Delete request completed");

    Ok(Json(MessageResponse {
        message: "Link deleted successfully".to_string(),
    }))
}
