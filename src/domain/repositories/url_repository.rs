//! Repository trait for shortened URL persistence.

use crate::domain::entities::{NewShortenedUrl, ShortenedUrl};
use crate::domain::errors::StoreError;
use async_trait::async_trait;

/// Repository interface for slug-to-URL mappings.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryUrlRepository`] - In-process fake
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_url.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Persists a new mapping and returns the stored record.
    ///
    /// The write is durable when this returns: the short URL may be handed to a client
    /// immediately afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateKey`] if the id or slug already exists.
    /// Returns [`StoreError::Database`] on backing-store errors.
    async fn save(&self, new_url: &NewShortenedUrl) -> Result<ShortenedUrl, StoreError>;

    /// Finds a mapping by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no record exists for `id`.
    /// Returns [`StoreError::Database`] on backing-store errors.
    async fn find(&self, id: i64) -> Result<ShortenedUrl, StoreError>;

    /// Checks whether the backing store is reachable.
    async fn health_check(&self) -> bool;
}
