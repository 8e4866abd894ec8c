//! In-process URL repository.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::entities::{NewShortenedUrl, ShortenedUrl};
use crate::domain::errors::StoreError;
use crate::domain::repositories::UrlRepository;

/// URL repository held in a map, for tests and local runs.
///
/// Enforces the same id and slug uniqueness as the `url_map` table.
#[derive(Default)]
pub struct InMemoryUrlRepository {
    records: RwLock<HashMap<i64, ShortenedUrl>>,
}

impl InMemoryUrlRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored mappings.
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> StoreError {
    StoreError::Database("url map poisoned".to_string())
}

#[async_trait]
impl UrlRepository for InMemoryUrlRepository {
    async fn save(&self, new_url: &NewShortenedUrl) -> Result<ShortenedUrl, StoreError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;

        if records.contains_key(&new_url.id) {
            return Err(StoreError::DuplicateKey("url_map_pkey".to_string()));
        }
        if records.values().any(|r| r.slug == new_url.slug) {
            return Err(StoreError::DuplicateKey("url_map_slug_key".to_string()));
        }

        let record = new_url.clone().into_record(Utc::now());
        records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find(&self, id: i64) -> Result<ShortenedUrl, StoreError> {
        self.records
            .read()
            .map_err(|_| poisoned())?
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn health_check(&self) -> bool {
        self.records.read().is_ok()
    }
}
