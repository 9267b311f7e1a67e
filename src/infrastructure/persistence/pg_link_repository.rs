//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::debug;

use crate::domain::entities::{DeleteOutcome, Link, LinkSummary, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Name of the partial unique index guarding live hashes.
const LIVE_HASH_INDEX: &str = "links_hash_live_key";

/// Column list matching the field order of [`Link`].
macro_rules! link_columns {
    () => {
        "id, created_at, updated_at, deleted_at, url, hash, owner_id, click_count, remaining_lifetime"
    };
}

/// PostgreSQL repository for link storage and retrieval.
///
/// Uses bound parameters for every query; all multi-statement operations run
/// inside a transaction.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

/// Returns true if `e` is a unique violation on the live-hash index.
fn is_unique_violation_on_hash(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    matches!(db_err.constraint(), Some(LIVE_HASH_INDEX))
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut tx = self.pool.begin().await?;

        let purged = sqlx::query("DELETE FROM links WHERE hash = $1 AND deleted_at IS NOT NULL")
            .bind(&new_link.hash)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if purged > 0 {
            debug!(hash = %new_link.hash, purged, "Purged soft-deleted links holding reused hash");
        }

        let link = sqlx::query_as::<_, Link>(concat!(
            "INSERT INTO links (url, hash, owner_id, remaining_lifetime) ",
            "VALUES ($1, $2, $3, $4) ",
            "RETURNING ",
            link_columns!()
        ))
        .bind(&new_link.url)
        .bind(&new_link.hash)
        .bind(&new_link.owner_id)
        .bind(new_link.remaining_lifetime)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation_on_hash(&e) {
                AppError::conflict("Hash already exists", json!({ "hash": new_link.hash }))
            } else {
                AppError::from(e)
            }
        })?;

        tx.commit().await?;

        Ok(link)
    }

    async fn hash_exists(&self, hash: &str) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM links WHERE hash = $1 AND deleted_at IS NULL)",
        )
        .bind(hash)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(exists)
    }

    async fn owner_id_taken(&self, owner_id: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM links WHERE owner_id = $1)")
                .bind(owner_id)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(exists)
    }

    async fn owner_exists(&self, owner_id: &str) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM links WHERE owner_id = $1 AND deleted_at IS NULL)",
        )
        .bind(owner_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(exists)
    }

    async fn find_by_hash(&self, hash: &str) -> Result<Option<Link>, AppError> {
        let link = sqlx::query_as::<_, Link>(concat!(
            "SELECT ",
            link_columns!(),
            " FROM links WHERE hash = $1 AND deleted_at IS NULL"
        ))
        .bind(hash)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn find_owned_by_hash(
        &self,
        hash: &str,
        owner_id: &str,
    ) -> Result<Option<Link>, AppError> {
        let link = sqlx::query_as::<_, Link>(concat!(
            "SELECT ",
            link_columns!(),
            " FROM links WHERE hash = $1 AND owner_id = $2 AND deleted_at IS NULL"
        ))
        .bind(hash)
        .bind(owner_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn list_by_owner(
        &self,
        owner_id: &str,
        page: i64,
        limit: i64,
    ) -> Result<Vec<Link>, AppError> {
        let offset = (page - 1).saturating_mul(limit);

        let links = sqlx::query_as::<_, Link>(concat!(
            "SELECT ",
            link_columns!(),
            " FROM links",
            " WHERE owner_id = $1 AND deleted_at IS NULL",
            " ORDER BY created_at DESC, id DESC",
            " LIMIT $2 OFFSET $3"
        ))
        .bind(owner_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(links)
    }

    async fn count_by_owner(&self, owner_id: &str) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM links WHERE owner_id = $1 AND deleted_at IS NULL",
        )
        .bind(owner_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn update_click_count(&self, id: i64, click_count: i64) -> Result<(), AppError> {
        // GREATEST keeps the counter monotonic when a stale write lands late.
        sqlx::query(
            "UPDATE links SET click_count = GREATEST(click_count, $2), updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(click_count)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn delete_owned(&self, hash: &str, owner_id: &str) -> Result<DeleteOutcome, AppError> {
        let mut tx = self.pool.begin().await?;

        let live: Option<(i64, String)> = sqlx::query_as(
            "SELECT id, owner_id FROM links WHERE hash = $1 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(hash)
        .fetch_optional(&mut *tx)
        .await?;

        let outcome = match live {
            Some((id, live_owner)) if live_owner == owner_id => {
                sqlx::query("UPDATE links SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                DeleteOutcome::Deleted
            }
            Some(_) => DeleteOutcome::NotPermitted,
            None => {
                let was_owned: bool = sqlx::query_scalar(
                    "SELECT EXISTS(SELECT 1 FROM links WHERE hash = $1 AND owner_id = $2 AND deleted_at IS NOT NULL)",
                )
                .bind(hash)
                .bind(owner_id)
                .fetch_one(&mut *tx)
                .await?;

                if was_owned {
                    DeleteOutcome::AlreadyDeleted
                } else {
                    DeleteOutcome::NotPermitted
                }
            }
        };

        tx.commit().await?;

        Ok(outcome)
    }

    async fn decrement_lifetimes(&self) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE links SET remaining_lifetime = remaining_lifetime - 1, updated_at = NOW() \
             WHERE remaining_lifetime > 0 AND deleted_at IS NULL",
        )
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected())
    }

    async fn purge_expired(&self) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE links SET deleted_at = NOW(), updated_at = NOW() \
             WHERE remaining_lifetime <= 0 AND deleted_at IS NULL",
        )
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected())
    }

    async fn summary(&self) -> Result<LinkSummary, AppError> {
        let (live_links, deleted_links, total_clicks): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE deleted_at IS NULL),
                COUNT(*) FILTER (WHERE deleted_at IS NOT NULL),
                COALESCE(SUM(click_count), 0)::BIGINT
            FROM links
            "#,
        )
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(LinkSummary {
            live_links,
            deleted_links,
            total_clicks,
        })
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
