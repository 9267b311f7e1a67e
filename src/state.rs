//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::LinkService;
use crate::domain::repositories::LinkRepository;

/// State cloned into each request by axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
}

impl AppState {
    /// Builds the state around a repository implementation.
    pub fn new(repository: Arc<dyn LinkRepository>, default_lifetime_days: i64) -> Self {
        Self {
            link_service: Arc::new(LinkService::new(repository, default_lifetime_days)),
        }
    }
}
