//! Storage primitives behind the malicious-URL blocklist.

use crate::domain::errors::CacheError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Shared state used by the guardian.
///
/// The store keeps the live blocklist plus one transient "refreshed this cycle" marker set
/// per reconcile cycle, keyed by the cycle's id. A cycle adds every feed entry to the live
/// set and its own marker, evicts `live - marker`, then drops its marker. Additions are
/// applied to both sets atomically per batch so readers never see a half-written entry.
///
/// Markers are never shared, so a cycle that outlives its lock and overlaps the next one
/// still evicts against the complete feed it fetched.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisBlocklistStore`] - Redis sets and strings
/// - [`crate::infrastructure::cache::InMemoryBlocklistStore`] - In-process fake
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlocklistStore: Send + Sync {
    /// Returns true if `url` is in the live set.
    async fn contains(&self, url: &str) -> Result<bool, CacheError>;

    /// Adds `urls` to the live set and to the marker set of `cycle`.
    ///
    /// Returns the number of entries that were not in the live set before.
    async fn add_entries(&self, cycle: &str, urls: &[String]) -> Result<u64, CacheError>;

    /// Returns live entries missing from the marker set of `cycle`.
    async fn stale_entries(&self, cycle: &str) -> Result<Vec<String>, CacheError>;

    /// Removes `urls` from the live set and returns how many were removed.
    async fn remove_entries(&self, urls: &[String]) -> Result<u64, CacheError>;

    /// Drops the marker set of `cycle`.
    async fn clear_refreshed(&self, cycle: &str) -> Result<(), CacheError>;

    /// Number of entries in the live set.
    async fn entry_count(&self) -> Result<u64, CacheError>;

    /// Time of the last successful reconcile, if any.
    async fn last_updated_at(&self) -> Result<Option<DateTime<Utc>>, CacheError>;

    /// Records the time of a successful reconcile.
    async fn set_last_updated_at(&self, at: DateTime<Utc>) -> Result<(), CacheError>;

    /// Tries to take the refresh lock for `ttl`. Returns false if someone else holds it.
    async fn try_acquire_refresh_lock(&self, token: &str, ttl: Duration)
    -> Result<bool, CacheError>;

    /// Releases the refresh lock if it is still held under `token`.
    async fn release_refresh_lock(&self, token: &str) -> Result<(), CacheError>;
}
