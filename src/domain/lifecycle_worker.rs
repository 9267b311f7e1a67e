//! Link lifetime accounting.
//!
//! Every tick takes one day off each live link and soft-deletes those that
//! have run out. The worker drives ticks on a fixed period until shutdown.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{error, info};

use crate::domain::entities::LifecycleReport;
use crate::domain::repositories::LinkRepository;

/// Runs one lifecycle tick: decrement every live lifetime, then soft-delete
/// the links that reached zero.
///
/// Step failures are logged and swallowed. A failed decrement does not skip
/// the purge; whatever was missed is picked up on the next tick.
pub async fn run_lifecycle_tick(repository: &dyn LinkRepository) -> LifecycleReport {
    let mut report = LifecycleReport::default();

    match repository.decrement_lifetimes().await {
        Ok(rows) => report.decremented = rows,
        Err(e) => error!(error = %e, "Failed to decrement link lifetimes"),
    }

    match repository.purge_expired().await {
        Ok(rows) => report.expired = rows,
        Err(e) => error!(error = %e, "Failed to purge expired links"),
    }

    report
}

/// Background loop driving [`run_lifecycle_tick`] every `period`.
///
/// The first tick fires one full period after start. The loop exits when
/// `shutdown` flips to `true` or its sender is dropped; a tick already in
/// progress finishes first.
pub async fn run_lifecycle_worker(
    repository: Arc<dyn LinkRepository>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(period_secs = period.as_secs(), "Lifecycle worker started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                info!("Processing lifetime updates for links");
                let report = run_lifecycle_tick(repository.as_ref()).await;
                info!(
                    decremented = report.decremented,
                    expired = report.expired,
                    "Lifetime update completed"
                );
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    info!("Lifecycle worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use crate::error::AppError;
    use serde_json::json;

    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    #[tokio::test]
    async fn test_tick_runs_both_steps_in_order() {
        let mut mock_repo = MockLinkRepository::new();
        let mut seq = mockall::Sequence::new();

        mock_repo
            .expect_decrement_lifetimes()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(7));
        mock_repo
            .expect_purge_expired()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(2));

        let report = run_lifecycle_tick(&mock_repo).await;

        assert_eq!(report.decremented, 7);
        assert_eq!(report.expired, 2);
    }

    #[tokio::test]
    async fn test_tick_with_no_eligible_rows_is_noop() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_decrement_lifetimes().returning(|| Ok(0));
        mock_repo.expect_purge_expired().returning(|| Ok(0));

        let report = run_lifecycle_tick(&mock_repo).await;

        assert_eq!(report, LifecycleReport::default());
    }

    #[tokio::test]
    async fn test_tick_purges_even_when_decrement_fails() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_decrement_lifetimes()
            .times(1)
            .returning(|| Err(AppError::internal("Database error", json!({}))));
        mock_repo.expect_purge_expired().times(1).returning(|| Ok(3));

        let report = run_lifecycle_tick(&mock_repo).await;

        assert_eq!(report.decremented, 0);
        assert_eq!(report.expired, 3);
    }

    #[tokio::test]
    async fn test_tick_swallows_purge_failure() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_decrement_lifetimes().returning(|| Ok(4));
        mock_repo
            .expect_purge_expired()
            .returning(|| Err(AppError::internal("Database error", json!({}))));

        let report = run_lifecycle_tick(&mock_repo).await;

        assert_eq!(report.decremented, 4);
        assert_eq!(report.expired, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_worker_ticks_once_per_period_and_stops_on_signal() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_decrement_lifetimes()
            .times(2)
            .returning(|| Ok(1));
        mock_repo.expect_purge_expired().times(2).returning(|| Ok(0));

        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(run_lifecycle_worker(Arc::new(mock_repo), DAY, rx));

        // Nothing fires before the first full period.
        tokio::time::sleep(DAY - Duration::from_secs(1)).await;
        // Two periods in total.
        tokio::time::sleep(DAY + Duration::from_secs(2)).await;

        tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_worker_stops_when_sender_dropped() {
        let mock_repo = MockLinkRepository::new();
        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(run_lifecycle_worker(Arc::new(mock_repo), DAY, rx));

        drop(tx);
        handle.await.unwrap();
    }
}
