//! API route configuration.

use crate::api::handlers::{
    create_link_handler, delete_link_handler, get_link_handler, list_links_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// Link management routes, nested under `/api/v1`.
///
/// # Endpoints
///
/// - `GET    /links?user_id&hash`              - Fetch one owned link
/// - `POST   /links`                           - Create a link
/// - `DELETE /links`                           - Soft-delete an owned link
/// - `GET    /links/all?user_id&page&limit`    - List owned links
pub fn link_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/links",
            get(get_link_handler)
                .post(create_link_handler)
                .delete(delete_link_handler),
        )
        .route("/links/all", get(list_links_handler))
}
