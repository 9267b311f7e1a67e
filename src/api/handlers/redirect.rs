//! Handler for short link redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::info;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a hash to its destination URL.
///
/// # Endpoint
///
/// `GET /{hash}`
///
/// # Request Flow
///
/// 1. Look up the live link by hash
/// 2. Write back the incremented click counter (failures are logged only)
/// 3. Return 302 Found with `Location`
///
/// # Errors
///
/// Returns 404 Not Found if no live link holds the hash.
pub async fn redirect_handler(
    Path(hash): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    if hash.is_empty() {
        return Err(missing_hash());
    }

    let link = state.link_service.visit(&hash).await?;

    info!(
        hash = %link.hash,
        url = %link.url,
        clicks = link.click_count,
        "Redirecting"
    );

    Ok((StatusCode::FOUND, [(header::LOCATION, link.url)]).into_response())
}

/// Rejects a redirect request without a hash.
///
/// # Endpoint
///
/// `GET /`
pub async fn missing_hash_handler() -> AppError {
    missing_hash()
}

fn missing_hash() -> AppError {
    AppError::bad_request("Hash is required", json!({}))
}
