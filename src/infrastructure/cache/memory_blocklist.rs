//! In-process blocklist store for tests and local development.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::domain::errors::CacheError;
use crate::domain::repositories::BlocklistStore;

#[derive(Default)]
struct State {
    live: HashSet<String>,
    refreshed: HashMap<String, HashSet<String>>,
    last_updated_at: Option<DateTime<Utc>>,
    lock: Option<(String, Instant)>,
}

/// A blocklist store held in memory.
///
/// Mirrors [`super::RedisBlocklistStore`] semantics, including lock expiry, but state is
/// local to the process and lost on restart.
#[derive(Default)]
pub struct InMemoryBlocklistStore {
    state: Mutex<State>,
}

impl InMemoryBlocklistStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, State>, CacheError> {
        self.state
            .lock()
            .map_err(|_| CacheError::Unavailable("blocklist state poisoned".to_string()))
    }

    /// Live entries, sorted.
    pub fn snapshot(&self) -> Vec<String> {
        let mut entries: Vec<String> = self
            .state()
            .map(|s| s.live.iter().cloned().collect())
            .unwrap_or_default();
        entries.sort();
        entries
    }

    /// Marker entries of `cycle`, sorted.
    pub fn refreshed_snapshot(&self, cycle: &str) -> Vec<String> {
        let mut entries: Vec<String> = self
            .state()
            .map(|s| {
                s.refreshed
                    .get(cycle)
                    .map(|marker| marker.iter().cloned().collect())
                    .unwrap_or_default()
            })
            .unwrap_or_default();
        entries.sort();
        entries
    }

    /// Number of cycles whose marker set has not been dropped yet.
    pub fn open_cycles(&self) -> usize {
        self.state().map(|s| s.refreshed.len()).unwrap_or_default()
    }

    /// Returns true while an unexpired refresh lock is held.
    pub fn is_refresh_locked(&self) -> bool {
        self.state()
            .map(|s| matches!(&s.lock, Some((_, expires)) if *expires > Instant::now()))
            .unwrap_or(false)
    }
}

#[async_trait]
impl BlocklistStore for InMemoryBlocklistStore {
    async fn contains(&self, url: &str) -> Result<bool, CacheError> {
        Ok(self.state()?.live.contains(url))
    }

    async fn add_entries(&self, cycle: &str, urls: &[String]) -> Result<u64, CacheError> {
        if urls.is_empty() {
            return Ok(0);
        }

        let mut state = self.state()?;
        let State {
            live, refreshed, ..
        } = &mut *state;
        let marker = refreshed.entry(cycle.to_string()).or_default();
        let mut added = 0;
        for url in urls {
            if live.insert(url.clone()) {
                added += 1;
            }
            marker.insert(url.clone());
        }
        Ok(added)
    }

    async fn stale_entries(&self, cycle: &str) -> Result<Vec<String>, CacheError> {
        let state = self.state()?;
        Ok(match state.refreshed.get(cycle) {
            Some(marker) => state.live.difference(marker).cloned().collect(),
            None => state.live.iter().cloned().collect(),
        })
    }

    async fn remove_entries(&self, urls: &[String]) -> Result<u64, CacheError> {
        let mut state = self.state()?;
        Ok(urls.iter().filter(|url| state.live.remove(*url)).count() as u64)
    }

    async fn clear_refreshed(&self, cycle: &str) -> Result<(), CacheError> {
        self.state()?.refreshed.remove(cycle);
        Ok(())
    }

    async fn entry_count(&self) -> Result<u64, CacheError> {
        Ok(self.state()?.live.len() as u64)
    }

    async fn last_updated_at(&self) -> Result<Option<DateTime<Utc>>, CacheError> {
        Ok(self.state()?.last_updated_at)
    }

    async fn set_last_updated_at(&self, at: DateTime<Utc>) -> Result<(), CacheError> {
        self.state()?.last_updated_at = Some(at);
        Ok(())
    }

    async fn try_acquire_refresh_lock(
        &self,
        token: &str,
        ttl: Duration,
    ) -> Result<bool, CacheError> {
        let mut state = self.state()?;
        let now = Instant::now();
        if matches!(&state.lock, Some((_, expires)) if *expires > now) {
            return Ok(false);
        }
        state.lock = Some((token.to_string(), now + ttl));
        Ok(true)
    }

    async fn release_refresh_lock(&self, token: &str) -> Result<(), CacheError> {
        let mut state = self.state()?;
        if matches!(&state.lock, Some((held, _)) if held == token) {
            state.lock = None;
        }
        Ok(())
    }
}
