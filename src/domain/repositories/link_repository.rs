//! Repository trait for link data access.

use crate::domain::entities::{DeleteOutcome, Link, LinkSummary, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for the `links` table.
///
/// "Live" means `deleted_at IS NULL`. Hash uniqueness is only enforced among
/// live rows.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_link.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a link, first purging any soft-deleted row that holds the same
    /// hash. Both statements run in one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if a live row already holds the hash.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Returns true if a live row holds `hash`.
    async fn hash_exists(&self, hash: &str) -> Result<bool, AppError>;

    /// Returns true if any row, live or deleted, carries `owner_id`.
    async fn owner_id_taken(&self, owner_id: &str) -> Result<bool, AppError>;

    /// Returns true if `owner_id` owns at least one live link.
    async fn owner_exists(&self, owner_id: &str) -> Result<bool, AppError>;

    /// Finds a live link by hash.
    async fn find_by_hash(&self, hash: &str) -> Result<Option<Link>, AppError>;

    /// Finds a live link by hash that belongs to `owner_id`.
    async fn find_owned_by_hash(
        &self,
        hash: &str,
        owner_id: &str,
    ) -> Result<Option<Link>, AppError>;

    /// Lists an owner's live links, newest first.
    ///
    /// # Arguments
    ///
    /// - `page` - Page number (1-indexed)
    /// - `limit` - Number of items per page
    async fn list_by_owner(
        &self,
        owner_id: &str,
        page: i64,
        limit: i64,
    ) -> Result<Vec<Link>, AppError>;

    /// Counts an owner's live links.
    async fn count_by_owner(&self, owner_id: &str) -> Result<i64, AppError>;

    /// Overwrites the click counter of a link.
    ///
    /// The caller computes the new value from a previous read, so concurrent
    /// writers can lose increments.
    async fn update_click_count(&self, id: i64, click_count: i64) -> Result<(), AppError>;

    /// Soft-deletes the caller's live link with `hash`.
    ///
    /// The ownership check and the update share one transaction.
    async fn delete_owned(&self, hash: &str, owner_id: &str) -> Result<DeleteOutcome, AppError>;

    /// Decrements `remaining_lifetime` on every live row above zero.
    ///
    /// Returns the number of rows updated.
    async fn decrement_lifetimes(&self) -> Result<u64, AppError>;

    /// Soft-deletes every live row whose lifetime reached zero.
    ///
    /// Returns the number of rows deleted.
    async fn purge_expired(&self) -> Result<u64, AppError>;

    /// Aggregate counts across the whole table.
    async fn summary(&self) -> Result<LinkSummary, AppError>;

    /// Round-trips a trivial query to check connectivity.
    async fn ping(&self) -> Result<(), AppError>;
}
