//! Malicious-URL guardian backed by a blocklist store and a threat feed.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use tracing::{debug, info, warn};

use crate::domain::entities::{GuardianStatus, RefreshOutcome};
use crate::domain::errors::{CacheError, FeedError, GuardianError};
use crate::domain::repositories::{BlocklistStore, ThreatFeed, UrlGuardian};

/// Number of entries written to the store per batch.
const BATCH_SIZE: usize = 1_000;

/// Refresh policy for [`GuardianService`].
#[derive(Debug, Clone)]
pub struct GuardianConfig {
    /// Minimum time between two fetches of the feed. URLhaus asks clients not to poll
    /// more often than every 5 minutes.
    pub min_refresh_interval: TimeDelta,
    /// How long a refresh may hold the distributed lock. Must exceed the feed timeout.
    pub lock_ttl: Duration,
}

impl Default for GuardianConfig {
    fn default() -> Self {
        Self {
            min_refresh_interval: TimeDelta::minutes(5),
            lock_ttl: Duration::from_secs(120),
        }
    }
}

/// Guardian that keeps the blocklist store consistent with the threat feed.
///
/// # Reconcile Cycle
///
/// 1. Take the refresh lock, or report [`RefreshOutcome::Locked`]
/// 2. Skip if the last refresh is younger than `min_refresh_interval`
/// 3. Fetch the full snapshot (the store is untouched if this fails)
/// 4. Add every entry to the live set and to this cycle's marker set
/// 5. Evict `live - marker`
/// 6. Record the fetch time, drop the marker and release the lock
///
/// Additions always precede evictions, so the live set never drops to a partial state
/// while requests are being checked against it. The marker set is keyed by the lock token:
/// a cycle that outlives its lock and overlaps the next one evicts only against its own
/// fetched snapshot.
pub struct GuardianService {
    store: Arc<dyn BlocklistStore>,
    feed: Arc<dyn ThreatFeed>,
    config: GuardianConfig,
}

impl GuardianService {
    /// Creates a new guardian.
    pub fn new(
        store: Arc<dyn BlocklistStore>,
        feed: Arc<dyn ThreatFeed>,
        config: GuardianConfig,
    ) -> Self {
        Self {
            store,
            feed,
            config,
        }
    }

    async fn reconcile(&self, cycle: &str) -> Result<RefreshOutcome, GuardianError> {
        if let Some(last_updated_at) = self.store.last_updated_at().await?
            && Utc::now() - last_updated_at < self.config.min_refresh_interval
        {
            warn!(%last_updated_at, "Blocklist was refreshed recently, skipping fetch");
            return Ok(RefreshOutcome::Skipped { last_updated_at });
        }

        let snapshot = self.feed.fetch_all().await?;
        let fetched_at = Utc::now();

        let mut entries: Vec<String> = snapshot
            .into_iter()
            .map(|record| record.url)
            .filter(|url| !url.is_empty())
            .collect();
        entries.sort_unstable();
        entries.dedup();

        if entries.is_empty() {
            let current = self.store.entry_count().await?;
            warn!(
                current_entries = current,
                "Threat feed returned an empty snapshot, keeping the current blocklist"
            );
            return Err(FeedError::EmptySnapshot.into());
        }

        let mut added = 0;
        for batch in entries.chunks(BATCH_SIZE) {
            added += self.store.add_entries(cycle, batch).await?;
        }

        let stale = self.store.stale_entries(cycle).await?;
        let mut evicted = 0;
        for batch in stale.chunks(BATCH_SIZE) {
            evicted += self.store.remove_entries(batch).await?;
        }
        info!(evicted, "Deleted stale URLs from blocklist");
        metrics::counter!("snip_guardian_evicted_total").increment(evicted);

        self.store.set_last_updated_at(fetched_at).await?;

        Ok(RefreshOutcome::Reconciled {
            fetched: entries.len(),
            added,
            evicted,
        })
    }
}

#[async_trait]
impl UrlGuardian for GuardianService {
    async fn safe_url(&self, url: &str) -> Result<bool, CacheError> {
        let blocked = self.store.contains(url).await.inspect_err(|e| {
            warn!(url, error = %e, "Error while determining whether URL is safe");
        })?;

        Ok(!blocked)
    }

    async fn refresh_from_feed(&self) -> Result<RefreshOutcome, GuardianError> {
        let token = hex::encode(rand::random::<[u8; 16]>());

        if !self
            .store
            .try_acquire_refresh_lock(&token, self.config.lock_ttl)
            .await?
        {
            debug!("Refresh lock is held by another instance");
            return Ok(RefreshOutcome::Locked);
        }

        let result = self.reconcile(&token).await;

        if let Err(e) = self.store.clear_refreshed(&token).await {
            warn!(error = %e, "Failed to drop refresh marker set");
        }
        if let Err(e) = self.store.release_refresh_lock(&token).await {
            warn!(error = %e, "Failed to release refresh lock, it will expire on its own");
        }

        result
    }

    async fn status(&self) -> Result<GuardianStatus, CacheError> {
        Ok(GuardianStatus {
            entries: self.store.entry_count().await?,
            last_updated_at: self.store.last_updated_at().await?,
        })
    }
}
