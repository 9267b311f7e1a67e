//! Link creation, lookup, redirect and deletion service.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::entities::{DeleteOutcome, LifecycleReport, Link, LinkPage, LinkSummary, NewLink};
use crate::domain::lifecycle_worker::run_lifecycle_tick;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::hash_generator::{generate_hash, generate_owner_id, validate_custom_hash};
use crate::utils::url_validator::validate_target_url;

/// Page number used when none (or a non-positive one) is requested.
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when none (or a non-positive one) is requested.
pub const DEFAULT_LIMIT: i64 = 10;

/// Largest page size served; bigger requests are clamped to it.
pub const MAX_LIMIT: i64 = 100;

/// Safety valve for the random re-roll loops.
const MAX_ALLOCATION_ATTEMPTS: usize = 1000;

/// Fields accepted when creating a link.
///
/// Empty strings are treated the same as absent values.
#[derive(Debug, Clone, Default)]
pub struct CreateLink {
    pub url: String,
    pub owner_id: Option<String>,
    pub hash: Option<String>,
}

/// Service for creating, resolving and deleting short links.
///
/// Holds no locks of its own: hash uniqueness is settled by the store's
/// live-hash index and transactions.
pub struct LinkService {
    repository: Arc<dyn LinkRepository>,
    default_lifetime_days: i64,
}

impl LinkService {
    /// Creates a new link service.
    pub fn new(repository: Arc<dyn LinkRepository>, default_lifetime_days: i64) -> Self {
        Self {
            repository,
            default_lifetime_days,
        }
    }

    /// Creates a short link.
    ///
    /// # Flow
    ///
    /// 1. Validate the destination URL and the custom hash format
    /// 2. If an owner id is supplied it must already own a live link
    /// 3. Resolve the hash (custom or generated)
    /// 4. Resolve the owner id (supplied or generated)
    /// 5. Insert with the default lifetime and zero clicks, purging any
    ///    soft-deleted row that held the same hash
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for a bad URL or custom hash
    /// - [`AppError::NotFound`] if the supplied owner id is unknown
    /// - [`AppError::Conflict`] if the custom hash is held by a live link
    pub async fn create_link(&self, request: CreateLink) -> Result<Link, AppError> {
        let url = validate_target_url(&request.url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        let custom_hash = request.hash.filter(|h| !h.is_empty());
        if let Some(hash) = &custom_hash {
            validate_custom_hash(hash)?;
        }

        let supplied_owner = request.owner_id.filter(|o| !o.is_empty());
        if let Some(owner_id) = &supplied_owner {
            if !self.repository.owner_exists(owner_id).await? {
                return Err(AppError::not_found(
                    "User ID not found",
                    json!({ "user_id": owner_id }),
                ));
            }
            debug!(user_id = %owner_id, "User ID exists, using it for the new link");
        }

        let hash = self.allocate_hash(custom_hash).await?;

        let owner_id = match supplied_owner {
            Some(owner_id) => owner_id,
            None => self.allocate_owner_id().await?,
        };

        let link = self
            .repository
            .create(NewLink {
                url,
                hash,
                owner_id,
                remaining_lifetime: self.default_lifetime_days,
            })
            .await?;

        info!(
            hash = %link.hash,
            url = %link.url,
            user_id = %link.owner_id,
            lifetime = link.remaining_lifetime,
            "Link created"
        );

        Ok(link)
    }

    /// Fetches a live link by hash.
    ///
    /// With an owner id the lookup is scoped to that owner and a miss is
    /// reported as [`AppError::Forbidden`], so callers cannot probe other
    /// owners' hashes. Without one a miss is [`AppError::NotFound`].
    pub async fn get_link(&self, hash: &str, owner_id: Option<&str>) -> Result<Link, AppError> {
        match owner_id {
            Some(owner_id) => self
                .repository
                .find_owned_by_hash(hash, owner_id)
                .await?
                .ok_or_else(|| {
                    AppError::forbidden(
                        "Link not found or user does not have access",
                        json!({ "hash": hash, "user_id": owner_id }),
                    )
                }),
            None => self.repository.find_by_hash(hash).await?.ok_or_else(|| {
                AppError::not_found("Link not found", json!({ "hash": hash }))
            }),
        }
    }

    /// Lists an owner's live links, newest first.
    ///
    /// A missing or unknown owner yields an empty page rather than an error.
    /// Non-positive `page` / `limit` fall back to [`DEFAULT_PAGE`] /
    /// [`DEFAULT_LIMIT`], and `limit` is capped at [`MAX_LIMIT`].
    pub async fn list_links(
        &self,
        owner_id: Option<&str>,
        page: i64,
        limit: i64,
    ) -> Result<LinkPage, AppError> {
        let page = if page > 0 { page } else { DEFAULT_PAGE };
        let limit = if limit > 0 {
            limit.min(MAX_LIMIT)
        } else {
            DEFAULT_LIMIT
        };

        let Some(owner_id) = owner_id.filter(|o| !o.is_empty()) else {
            warn!("User ID is missing, returning empty result");
            return Ok(LinkPage::empty(page, limit));
        };

        if !self.repository.owner_exists(owner_id).await? {
            info!(user_id = %owner_id, "User ID does not exist, returning empty result");
            return Ok(LinkPage::empty(page, limit));
        }

        let total_links = self.repository.count_by_owner(owner_id).await?;
        let links = self.repository.list_by_owner(owner_id, page, limit).await?;

        Ok(LinkPage {
            links,
            total_links,
            total_pages: LinkPage::page_count(total_links, limit),
            page,
            limit,
        })
    }

    /// Resolves a hash for redirection and counts the visit.
    ///
    /// The click counter is read with the link and written back incremented.
    /// Concurrent visits to the same link may under-count. A failed counter
    /// write is logged and does not stop the redirect.
    pub async fn visit(&self, hash: &str) -> Result<Link, AppError> {
        let mut link = self.get_link(hash, None).await?;

        let next = link.click_count + 1;
        match self.repository.update_click_count(link.id, next).await {
            Ok(()) => link.click_count = next,
            Err(e) => warn!(error = %e, hash = %hash, "Failed to update click count"),
        }

        Ok(link)
    }

    /// Soft-deletes the caller's link.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if hash or owner id is empty
    /// - [`AppError::Forbidden`] if no live link with this hash belongs to the caller
    /// - [`AppError::NotFound`] if the caller's link was already deleted
    pub async fn delete_link(&self, hash: &str, owner_id: &str) -> Result<(), AppError> {
        if hash.is_empty() {
            return Err(AppError::bad_request("Hash is required", json!({})));
        }
        if owner_id.is_empty() {
            return Err(AppError::bad_request("User ID is required", json!({})));
        }

        match self.repository.delete_owned(hash, owner_id).await? {
            DeleteOutcome::Deleted => {
                info!(hash = %hash, user_id = %owner_id, "Link deleted");
                Ok(())
            }
            DeleteOutcome::NotPermitted => Err(AppError::forbidden(
                "Link not found or user does not have permission",
                json!({ "hash": hash, "user_id": owner_id }),
            )),
            DeleteOutcome::AlreadyDeleted => Err(AppError::not_found(
                "Link not found or already deleted",
                json!({ "hash": hash }),
            )),
        }
    }

    /// Runs one lifecycle tick immediately.
    pub async fn run_lifecycle_tick(&self) -> LifecycleReport {
        run_lifecycle_tick(self.repository.as_ref()).await
    }

    /// Aggregate link and click counts.
    pub async fn summary(&self) -> Result<LinkSummary, AppError> {
        self.repository.summary().await
    }

    /// Checks that the store is reachable.
    pub async fn health_check(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }

    /// Returns a hash free among live links.
    ///
    /// A custom hash is accepted unless a live link holds it; soft-deleted
    /// holders do not block reuse. Without one, random hashes are drawn until
    /// a free one turns up.
    async fn allocate_hash(&self, custom_hash: Option<String>) -> Result<String, AppError> {
        if let Some(hash) = custom_hash {
            if self.repository.hash_exists(&hash).await? {
                warn!(hash = %hash, "Attempted to create link with existing hash");
                return Err(AppError::conflict(
                    "Hash already exists",
                    json!({ "hash": hash }),
                ));
            }
            return Ok(hash);
        }

        for _ in 0..MAX_ALLOCATION_ATTEMPTS {
            let hash = generate_hash();
            if !self.repository.hash_exists(&hash).await? {
                return Ok(hash);
            }
            debug!(hash = %hash, "Generated hash collided, re-rolling");
        }

        Err(AppError::internal(
            "Failed to generate unique hash",
            json!({ "reason": "Too many collisions" }),
        ))
    }

    /// Returns an owner id not used by any row, live or deleted.
    async fn allocate_owner_id(&self) -> Result<String, AppError> {
        for _ in 0..MAX_ALLOCATION_ATTEMPTS {
            let owner_id = generate_owner_id();
            if !self.repository.owner_id_taken(&owner_id).await? {
                return Ok(owner_id);
            }
        }

        Err(AppError::internal(
            "Failed to generate unique user ID",
            json!({ "reason": "Too many collisions" }),
        ))
    }
}
