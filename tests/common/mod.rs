#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use snip::application::services::{GuardianConfig, GuardianService, ShortenerService};
use snip::domain::entities::MaliciousUrl;
use snip::domain::errors::{CacheError, FeedError};
use snip::domain::repositories::{BlocklistStore, ThreatFeed, UrlGuardian, UrlRepository};
use snip::infrastructure::cache::InMemoryBlocklistStore;
use snip::infrastructure::persistence::InMemoryUrlRepository;
use snip::infrastructure::sequence::AtomicIdSequence;
use snip::state::AppState;

pub const HOSTNAME: &str = "https://snip.to";

/// Threat feed returning a preset snapshot or error.
pub struct StaticFeed {
    response: Mutex<Result<Vec<MaliciousUrl>, FeedError>>,
    calls: AtomicUsize,
}

impl StaticFeed {
    pub fn new(urls: &[&str]) -> Self {
        Self {
            response: Mutex::new(Ok(urls.iter().map(|u| MaliciousUrl::from_url(*u)).collect())),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_urls(&self, urls: &[&str]) {
        *self.response.lock().unwrap() =
            Ok(urls.iter().map(|u| MaliciousUrl::from_url(*u)).collect());
    }

    pub fn fail_with(&self, err: FeedError) {
        *self.response.lock().unwrap() = Err(err);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ThreatFeed for StaticFeed {
    async fn fetch_all(&self) -> Result<Vec<MaliciousUrl>, FeedError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.lock().unwrap().clone()
    }
}

/// Blocklist store whose backend is down.
pub struct UnavailableBlocklist;

fn down() -> CacheError {
    CacheError::Unavailable("connection refused".to_string())
}

#[async_trait]
impl BlocklistStore for UnavailableBlocklist {
    async fn contains(&self, _url: &str) -> Result<bool, CacheError> {
        Err(down())
    }
    async fn add_entries(&self, _cycle: &str, _urls: &[String]) -> Result<u64, CacheError> {
        Err(down())
    }
    async fn stale_entries(&self, _cycle: &str) -> Result<Vec<String>, CacheError> {
        Err(down())
    }
    async fn remove_entries(&self, _urls: &[String]) -> Result<u64, CacheError> {
        Err(down())
    }
    async fn clear_refreshed(&self, _cycle: &str) -> Result<(), CacheError> {
        Err(down())
    }
    async fn entry_count(&self) -> Result<u64, CacheError> {
        Err(down())
    }
    async fn last_updated_at(&self) -> Result<Option<DateTime<Utc>>, CacheError> {
        Err(down())
    }
    async fn set_last_updated_at(&self, _at: DateTime<Utc>) -> Result<(), CacheError> {
        Err(down())
    }
    async fn try_acquire_refresh_lock(
        &self,
        _token: &str,
        _ttl: Duration,
    ) -> Result<bool, CacheError> {
        Err(down())
    }
    async fn release_refresh_lock(&self, _token: &str) -> Result<(), CacheError> {
        Err(down())
    }
}

/// Guardian policy without the minimum refresh interval.
pub fn eager_guardian_config() -> GuardianConfig {
    GuardianConfig {
        min_refresh_interval: TimeDelta::zero(),
        lock_ttl: Duration::from_secs(30),
    }
}

/// Application wired to in-memory adapters.
pub struct TestApp {
    pub state: AppState,
    pub blocklist: Arc<InMemoryBlocklistStore>,
    pub feed: Arc<StaticFeed>,
    pub repository: Arc<InMemoryUrlRepository>,
    pub sequence: Arc<AtomicIdSequence>,
    pub guardian: Arc<GuardianService>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_sequence(AtomicIdSequence::new())
    }

    pub fn with_sequence(sequence: AtomicIdSequence) -> Self {
        let blocklist = Arc::new(InMemoryBlocklistStore::new());
        let feed = Arc::new(StaticFeed::new(&[]));
        let repository = Arc::new(InMemoryUrlRepository::new());
        let sequence = Arc::new(sequence);
        let guardian = Arc::new(GuardianService::new(
            blocklist.clone(),
            feed.clone(),
            eager_guardian_config(),
        ));

        let state = build_state(guardian.clone(), sequence.clone(), repository.clone());

        Self {
            state,
            blocklist,
            feed,
            repository,
            sequence,
            guardian,
        }
    }

    /// Puts `urls` on the blocklist directly.
    pub async fn block(&self, urls: &[&str]) {
        let urls: Vec<String> = urls.iter().map(|u| u.to_string()).collect();
        self.blocklist.add_entries("seed", &urls).await.unwrap();
        self.blocklist.clear_refreshed("seed").await.unwrap();
    }
}

/// State whose guardian cannot reach its blocklist.
pub fn state_with_unavailable_blocklist() -> AppState {
    let guardian = Arc::new(GuardianService::new(
        Arc::new(UnavailableBlocklist),
        Arc::new(StaticFeed::new(&[])),
        eager_guardian_config(),
    ));

    build_state(
        guardian,
        Arc::new(AtomicIdSequence::new()),
        Arc::new(InMemoryUrlRepository::new()),
    )
}

fn build_state(
    guardian: Arc<GuardianService>,
    sequence: Arc<AtomicIdSequence>,
    repository: Arc<InMemoryUrlRepository>,
) -> AppState {
    let guardian: Arc<dyn UrlGuardian> = guardian;
    let repository: Arc<dyn UrlRepository> = repository;

    let shortener = Arc::new(ShortenerService::new(
        HOSTNAME,
        guardian.clone(),
        sequence,
        repository.clone(),
    ));

    AppState::new(shortener, guardian, repository)
}
