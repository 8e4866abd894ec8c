mod common;

use std::sync::Arc;
use std::time::Duration;

use snip::application::services::{GuardianConfig, GuardianService};
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use snip::domain::entities::RefreshOutcome;
use snip::domain::errors::{CacheError, FeedError, GuardianError};
use snip::domain::refresh_worker::run_refresh_worker;
use snip::domain::repositories::{BlocklistStore, UrlGuardian};
use snip::infrastructure::cache::InMemoryBlocklistStore;
use tokio::sync::{Notify, watch};

fn setup(
    config: GuardianConfig,
) -> (
    Arc<InMemoryBlocklistStore>,
    Arc<common::StaticFeed>,
    GuardianService,
) {
    let store = Arc::new(InMemoryBlocklistStore::new());
    let feed = Arc::new(common::StaticFeed::new(&[]));
    let guardian = GuardianService::new(store.clone(), feed.clone(), config);
    (store, feed, guardian)
}

fn strings(urls: &[&str]) -> Vec<String> {
    let mut v: Vec<String> = urls.iter().map(|s| s.to_string()).collect();
    v.sort();
    v
}

#[tokio::test]
async fn test_live_set_follows_feed() {
    let (store, feed, guardian) = setup(common::eager_guardian_config());

    feed.set_urls(&["http://a.test/1", "http://a.test/2", "http://a.test/3"]);
    let first = guardian.refresh_from_feed().await.unwrap();
    assert_eq!(
        first,
        RefreshOutcome::Reconciled {
            fetched: 3,
            added: 3,
            evicted: 0
        }
    );

    feed.set_urls(&["http://a.test/2", "http://a.test/3", "http://a.test/4"]);
    let second = guardian.refresh_from_feed().await.unwrap();
    assert_eq!(
        second,
        RefreshOutcome::Reconciled {
            fetched: 3,
            added: 1,
            evicted: 1
        }
    );

    assert_eq!(
        store.snapshot(),
        strings(&["http://a.test/2", "http://a.test/3", "http://a.test/4"])
    );
    assert_eq!(store.open_cycles(), 0);
    assert!(guardian.safe_url("http://a.test/1").await.unwrap());
    assert!(!guardian.safe_url("http://a.test/4").await.unwrap());
}

#[tokio::test]
async fn test_refresh_within_min_interval_fetches_once() {
    let (_store, feed, guardian) = setup(GuardianConfig::default());
    feed.set_urls(&["http://a.test/1"]);

    let first = guardian.refresh_from_feed().await.unwrap();
    let second = guardian.refresh_from_feed().await.unwrap();

    assert_eq!(first.label(), "reconciled");
    assert!(matches!(second, RefreshOutcome::Skipped { .. }));
    assert_eq!(feed.calls(), 1);
}

#[tokio::test]
async fn test_failed_fetch_leaves_cache_unchanged() {
    let (store, feed, guardian) = setup(common::eager_guardian_config());
    feed.set_urls(&["http://a.test/1", "http://a.test/2"]);
    guardian.refresh_from_feed().await.unwrap();
    let updated_at = store.last_updated_at().await.unwrap();

    feed.fail_with(FeedError::Status(503));
    let result = guardian.refresh_from_feed().await;

    assert!(matches!(result, Err(GuardianError::Feed(FeedError::Status(503)))));
    assert_eq!(store.snapshot(), strings(&["http://a.test/1", "http://a.test/2"]));
    assert_eq!(store.last_updated_at().await.unwrap(), updated_at);
    assert!(!store.is_refresh_locked());
}

#[tokio::test]
async fn test_empty_snapshot_is_rejected() {
    let (store, feed, guardian) = setup(common::eager_guardian_config());
    feed.set_urls(&["http://a.test/1"]);
    guardian.refresh_from_feed().await.unwrap();

    feed.set_urls(&[]);
    let result = guardian.refresh_from_feed().await;

    assert!(matches!(
        result,
        Err(GuardianError::Feed(FeedError::EmptySnapshot))
    ));
    assert_eq!(store.snapshot(), strings(&["http://a.test/1"]));
}

#[tokio::test]
async fn test_refresh_skipped_while_locked() {
    let (store, feed, guardian) = setup(common::eager_guardian_config());
    feed.set_urls(&["http://a.test/1"]);

    assert!(
        store
            .try_acquire_refresh_lock("other-instance", Duration::from_secs(30))
            .await
            .unwrap()
    );

    let outcome = guardian.refresh_from_feed().await.unwrap();

    assert_eq!(outcome, RefreshOutcome::Locked);
    assert_eq!(feed.calls(), 0);
    assert!(store.snapshot().is_empty());
    assert!(store.is_refresh_locked());
}

#[tokio::test]
async fn test_status_reports_entries_and_refresh_time() {
    let (_store, feed, guardian) = setup(common::eager_guardian_config());

    let before = guardian.status().await.unwrap();
    assert_eq!(before.entries, 0);
    assert!(before.last_updated_at.is_none());

    feed.set_urls(&["http://a.test/1", "http://a.test/2", "http://a.test/2"]);
    guardian.refresh_from_feed().await.unwrap();

    let after = guardian.status().await.unwrap();
    assert_eq!(after.entries, 2);
    assert!(after.last_updated_at.is_some());
}

#[tokio::test]
async fn test_refresh_worker_runs_immediately_and_stops_on_shutdown() {
    let (store, feed, guardian) = setup(common::eager_guardian_config());
    feed.set_urls(&["http://a.test/1"]);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker = tokio::spawn(run_refresh_worker(
        Arc::new(guardian),
        Duration::from_secs(3600),
        shutdown_rx,
    ));

    tokio::time::timeout(Duration::from_secs(5), async {
        while feed.calls() == 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("worker did not refresh at startup");

    shutdown_tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(5), worker)
        .await
        .expect("worker did not stop")
        .unwrap();

    assert_eq!(feed.calls(), 1);
    assert_eq!(store.snapshot(), strings(&["http://a.test/1"]));
}

/// Store that parks a cycle right before it computes its stale entries.
struct PausedBeforeEviction {
    inner: Arc<InMemoryBlocklistStore>,
    reached: Notify,
    resume: Notify,
}

#[async_trait]
impl BlocklistStore for PausedBeforeEviction {
    async fn contains(&self, url: &str) -> Result<bool, CacheError> {
        self.inner.contains(url).await
    }
    async fn add_entries(&self, cycle: &str, urls: &[String]) -> Result<u64, CacheError> {
        self.inner.add_entries(cycle, urls).await
    }
    async fn stale_entries(&self, cycle: &str) -> Result<Vec<String>, CacheError> {
        self.reached.notify_one();
        self.resume.notified().await;
        self.inner.stale_entries(cycle).await
    }
    async fn remove_entries(&self, urls: &[String]) -> Result<u64, CacheError> {
        self.inner.remove_entries(urls).await
    }
    async fn clear_refreshed(&self, cycle: &str) -> Result<(), CacheError> {
        self.inner.clear_refreshed(cycle).await
    }
    async fn entry_count(&self) -> Result<u64, CacheError> {
        self.inner.entry_count().await
    }
    async fn last_updated_at(&self) -> Result<Option<DateTime<Utc>>, CacheError> {
        self.inner.last_updated_at().await
    }
    async fn set_last_updated_at(&self, at: DateTime<Utc>) -> Result<(), CacheError> {
        self.inner.set_last_updated_at(at).await
    }
    async fn try_acquire_refresh_lock(
        &self,
        token: &str,
        ttl: Duration,
    ) -> Result<bool, CacheError> {
        self.inner.try_acquire_refresh_lock(token, ttl).await
    }
    async fn release_refresh_lock(&self, token: &str) -> Result<(), CacheError> {
        self.inner.release_refresh_lock(token).await
    }
}

#[tokio::test]
async fn test_overlapping_cycles_keep_the_blocklist() {
    let urls = ["http://bad.test/1", "http://bad.test/2"];
    let short_lock = GuardianConfig {
        min_refresh_interval: TimeDelta::zero(),
        lock_ttl: Duration::from_millis(50),
    };

    let store = Arc::new(InMemoryBlocklistStore::new());
    let paused = Arc::new(PausedBeforeEviction {
        inner: store.clone(),
        reached: Notify::new(),
        resume: Notify::new(),
    });

    let slow = Arc::new(GuardianService::new(
        paused.clone(),
        Arc::new(common::StaticFeed::new(&urls)),
        short_lock.clone(),
    ));
    let fast = GuardianService::new(
        store.clone(),
        Arc::new(common::StaticFeed::new(&urls)),
        short_lock,
    );

    let slow_cycle = tokio::spawn({
        let slow = slow.clone();
        async move { slow.refresh_from_feed().await }
    });
    paused.reached.notified().await;

    // The slow cycle's lock has expired, so a second cycle runs to completion.
    tokio::time::sleep(Duration::from_millis(80)).await;
    let second = fast.refresh_from_feed().await.unwrap();
    assert_eq!(
        second,
        RefreshOutcome::Reconciled {
            fetched: 2,
            added: 0,
            evicted: 0
        }
    );

    paused.resume.notify_one();
    let first = slow_cycle.await.unwrap().unwrap();

    assert_eq!(
        first,
        RefreshOutcome::Reconciled {
            fetched: 2,
            added: 2,
            evicted: 0
        }
    );
    assert_eq!(store.snapshot(), strings(&urls));
    assert_eq!(store.open_cycles(), 0);
    assert!(!store.is_refresh_locked());
}
