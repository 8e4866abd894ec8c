//! Background worker driving periodic blocklist refreshes.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::domain::entities::RefreshOutcome;
use crate::domain::repositories::UrlGuardian;

/// Runs [`UrlGuardian::refresh_from_feed`] immediately and then every `every`.
///
/// Failures are logged and the worker keeps going; the next tick retries. The staleness
/// gate and refresh lock inside the guardian keep concurrent instances from hammering
/// the feed, so every instance can run this worker.
///
/// Returns when `shutdown` flips to `true` or its sender is dropped.
pub async fn run_refresh_worker(
    guardian: Arc<dyn UrlGuardian>,
    every: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(every_secs = every.as_secs(), "Guardian refresh worker started");

    loop {
        tokio::select! {
            _ = ticker.tick() => refresh_once(guardian.as_ref()).await,
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    info!("Guardian refresh worker stopped");
}

async fn refresh_once(guardian: &dyn UrlGuardian) {
    match guardian.refresh_from_feed().await {
        Ok(outcome) => {
            metrics::counter!("snip_guardian_refresh_total", "outcome" => outcome.label())
                .increment(1);
            match outcome {
                RefreshOutcome::Reconciled {
                    fetched,
                    added,
                    evicted,
                } => info!(fetched, added, evicted, "Guardian blocklist reconciled"),
                RefreshOutcome::Skipped { last_updated_at } => {
                    debug!(%last_updated_at, "Guardian blocklist is fresh, skipping")
                }
                RefreshOutcome::Locked => {
                    debug!("Guardian refresh is running elsewhere, skipping")
                }
            }
        }
        Err(e) => {
            metrics::counter!("snip_guardian_refresh_total", "outcome" => "failed").increment(1);
            error!(error = %e, "Guardian refresh failed");
        }
    }

    if let Ok(status) = guardian.status().await {
        metrics::gauge!("snip_guardian_entries").set(status.entries as f64);
    } else {
        warn!("Unable to read guardian status after refresh");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::GuardianStatus;
    use crate::domain::errors::{FeedError, GuardianError};
    use crate::domain::repositories::MockUrlGuardian;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn guardian_counting(calls: Arc<AtomicUsize>, fail: bool) -> MockUrlGuardian {
        let mut guardian = MockUrlGuardian::new();
        guardian.expect_refresh_from_feed().returning(move || {
            calls.fetch_add(1, Ordering::SeqCst);
            if fail {
                Err(GuardianError::Feed(FeedError::Status(500)))
            } else {
                Ok(RefreshOutcome::Reconciled {
                    fetched: 1,
                    added: 1,
                    evicted: 0,
                })
            }
        });
        guardian.expect_status().returning(|| {
            Ok(GuardianStatus {
                entries: 1,
                last_updated_at: None,
            })
        });
        guardian
    }

    #[tokio::test]
    async fn test_worker_refreshes_immediately_and_periodically() {
        let calls = Arc::new(AtomicUsize::new(0));
        let guardian = Arc::new(guardian_counting(calls.clone(), false));
        let (tx, rx) = watch::channel(false);

        let handle = tokio::spawn(run_refresh_worker(
            guardian,
            Duration::from_millis(20),
            rx,
        ));

        tokio::time::sleep(Duration::from_millis(90)).await;
        tx.send(true).unwrap();
        handle.await.unwrap();

        assert!(calls.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test]
    async fn test_worker_survives_refresh_failures() {
        let calls = Arc::new(AtomicUsize::new(0));
        let guardian = Arc::new(guardian_counting(calls.clone(), true));
        let (tx, rx) = watch::channel(false);

        let handle = tokio::spawn(run_refresh_worker(
            guardian,
            Duration::from_millis(20),
            rx,
        ));

        tokio::time::sleep(Duration::from_millis(90)).await;
        tx.send(true).unwrap();
        handle.await.unwrap();

        assert!(calls.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test]
    async fn test_worker_stops_when_sender_dropped() {
        let calls = Arc::new(AtomicUsize::new(0));
        let guardian = Arc::new(guardian_counting(calls.clone(), false));
        let (tx, rx) = watch::channel(false);

        let handle = tokio::spawn(run_refresh_worker(guardian, Duration::from_secs(3600), rx));

        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(tx);

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("worker should stop")
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
