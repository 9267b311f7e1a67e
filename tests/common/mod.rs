#![allow(dead_code)]

use link_shortener::domain::entities::Link;
use link_shortener::domain::repositories::LinkRepository;
use link_shortener::infrastructure::persistence::PgLinkRepository;
use link_shortener::state::AppState;
use sqlx::PgPool;
use std::sync::Arc;

pub const DEFAULT_LIFETIME: i64 = 90;

pub fn repository(pool: PgPool) -> Arc<dyn LinkRepository> {
    Arc::new(PgLinkRepository::new(Arc::new(pool)))
}

pub fn create_test_state(pool: PgPool) -> AppState {
    AppState::new(repository(pool), DEFAULT_LIFETIME)
}

pub async fn insert_link(pool: &PgPool, hash: &str, owner_id: &str, lifetime: i64) -> Link {
    sqlx::query_as::<_, Link>(
        "INSERT INTO links (url, hash, owner_id, remaining_lifetime) VALUES ($1, $2, $3, $4) \
         RETURNING id, created_at, updated_at, deleted_at, url, hash, owner_id, click_count, remaining_lifetime",
    )
    .bind("https://example.com")
    .bind(hash)
    .bind(owner_id)
    .bind(lifetime)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn insert_deleted_link(pool: &PgPool, hash: &str, owner_id: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO links (url, hash, owner_id, remaining_lifetime, deleted_at) \
         VALUES ($1, $2, $3, 0, NOW()) RETURNING id",
    )
    .bind("https://old.example.com")
    .bind(hash)
    .bind(owner_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn fetch_row(pool: &PgPool, id: i64) -> Option<Link> {
    sqlx::query_as::<_, Link>(
        "SELECT id, created_at, updated_at, deleted_at, url, hash, owner_id, click_count, remaining_lifetime \
         FROM links WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .unwrap()
}
