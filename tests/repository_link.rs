mod common;

use link_shortener::domain::entities::{DeleteOutcome, NewLink};
use link_shortener::domain::lifecycle_worker::run_lifecycle_tick;
use link_shortener::domain::repositories::LinkRepository;
use link_shortener::error::AppError;
use sqlx::PgPool;

fn new_link(hash: &str, owner_id: &str) -> NewLink {
    NewLink {
        url: "https://example.com".to_string(),
        hash: hash.to_string(),
        owner_id: owner_id.to_string(),
        remaining_lifetime: common::DEFAULT_LIFETIME,
    }
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance via DATABASE_URL"]
async fn test_create_link(pool: PgPool) {
    let repo = common::repository(pool);

    let link = repo.create(new_link("test123", "owner-1")).await.unwrap();

    assert_eq!(link.hash, "test123");
    assert_eq!(link.url, "https://example.com");
    assert_eq!(link.owner_id, "owner-1");
    assert_eq!(link.click_count, 0);
    assert_eq!(link.remaining_lifetime, common::DEFAULT_LIFETIME);
    assert!(!link.is_deleted());
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance via DATABASE_URL"]
async fn test_create_with_live_hash_conflicts(pool: PgPool) {
    let repo = common::repository(pool);
    repo.create(new_link("dup", "owner-1")).await.unwrap();

    let result = repo.create(new_link("dup", "owner-2")).await;

    assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance via DATABASE_URL"]
async fn test_create_reuses_hash_of_deleted_link(pool: PgPool) {
    let old_id = common::insert_deleted_link(&pool, "reused", "owner-1").await;
    let repo = common::repository(pool.clone());

    assert!(!repo.hash_exists("reused").await.unwrap());

    let link = repo.create(new_link("reused", "owner-2")).await.unwrap();

    assert_eq!(link.owner_id, "owner-2");
    assert!(common::fetch_row(&pool, old_id).await.is_none());
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance via DATABASE_URL"]
async fn test_owner_checks_distinguish_live_and_deleted(pool: PgPool) {
    common::insert_deleted_link(&pool, "gone", "retired-owner").await;
    let repo = common::repository(pool);

    assert!(repo.owner_id_taken("retired-owner").await.unwrap());
    assert!(!repo.owner_exists("retired-owner").await.unwrap());
    assert!(!repo.owner_id_taken("nobody").await.unwrap());
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance via DATABASE_URL"]
async fn test_find_owned_by_hash_hides_other_owners(pool: PgPool) {
    common::insert_link(&pool, "mine", "owner-1", 90).await;
    let repo = common::repository(pool);

    assert!(repo.find_owned_by_hash("mine", "owner-1").await.unwrap().is_some());
    assert!(repo.find_owned_by_hash("mine", "owner-2").await.unwrap().is_none());
    assert!(repo.find_by_hash("mine").await.unwrap().is_some());
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance via DATABASE_URL"]
async fn test_list_by_owner_paginates_newest_first(pool: PgPool) {
    for i in 0..15 {
        common::insert_link(&pool, &format!("h{i:02}"), "owner-1", 90).await;
    }
    common::insert_link(&pool, "other", "owner-2", 90).await;
    let repo = common::repository(pool);

    let total = repo.count_by_owner("owner-1").await.unwrap();
    let first = repo.list_by_owner("owner-1", 1, 10).await.unwrap();
    let second = repo.list_by_owner("owner-1", 2, 10).await.unwrap();

    assert_eq!(total, 15);
    assert_eq!(first.len(), 10);
    assert_eq!(second.len(), 5);
    assert_eq!(first[0].hash, "h14");
    assert_eq!(second[4].hash, "h00");
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance via DATABASE_URL"]
async fn test_update_click_count_never_goes_backwards(pool: PgPool) {
    let link = common::insert_link(&pool, "clicky", "owner-1", 90).await;
    let repo = common::repository(pool.clone());

    repo.update_click_count(link.id, 3).await.unwrap();
    repo.update_click_count(link.id, 2).await.unwrap();

    let row = common::fetch_row(&pool, link.id).await.unwrap();
    assert_eq!(row.click_count, 3);
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance via DATABASE_URL"]
async fn test_delete_owned_outcomes(pool: PgPool) {
    common::insert_link(&pool, "target", "owner-1", 90).await;
    let repo = common::repository(pool);

    assert_eq!(
        repo.delete_owned("target", "intruder").await.unwrap(),
        DeleteOutcome::NotPermitted
    );
    assert_eq!(
        repo.delete_owned("target", "owner-1").await.unwrap(),
        DeleteOutcome::Deleted
    );
    assert_eq!(
        repo.delete_owned("target", "owner-1").await.unwrap(),
        DeleteOutcome::AlreadyDeleted
    );
    assert_eq!(
        repo.delete_owned("never-existed", "owner-1").await.unwrap(),
        DeleteOutcome::NotPermitted
    );
    assert!(repo.find_by_hash("target").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance via DATABASE_URL"]
async fn test_lifecycle_ticks_expire_links(pool: PgPool) {
    let short = common::insert_link(&pool, "short", "owner-1", 2).await;
    let long = common::insert_link(&pool, "long", "owner-1", 5).await;
    let repo = common::repository(pool.clone());

    let first = run_lifecycle_tick(repo.as_ref()).await;
    assert_eq!(first.decremented, 2);
    assert_eq!(first.expired, 0);

    let second = run_lifecycle_tick(repo.as_ref()).await;
    assert_eq!(second.decremented, 2);
    assert_eq!(second.expired, 1);

    let short_row = common::fetch_row(&pool, short.id).await.unwrap();
    assert_eq!(short_row.remaining_lifetime, 0);
    assert!(short_row.is_deleted());

    let third = run_lifecycle_tick(repo.as_ref()).await;
    assert_eq!(third.decremented, 1);

    let long_row = common::fetch_row(&pool, long.id).await.unwrap();
    assert_eq!(long_row.remaining_lifetime, 2);
    assert!(!long_row.is_deleted());
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance via DATABASE_URL"]
async fn test_summary_counts(pool: PgPool) {
    let link = common::insert_link(&pool, "a", "owner-1", 90).await;
    common::insert_link(&pool, "b", "owner-1", 90).await;
    common::insert_deleted_link(&pool, "c", "owner-1").await;
    let repo = common::repository(pool);
    repo.update_click_count(link.id, 4).await.unwrap();

    let summary = repo.summary().await.unwrap();

    assert_eq!(summary.live_links, 2);
    assert_eq!(summary.deleted_links, 1);
    assert_eq!(summary.total_clicks, 4);
    repo.ping().await.unwrap();
}
