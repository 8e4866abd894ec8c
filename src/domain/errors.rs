//! Error taxonomy of the shorten/resolve engine.
//!
//! Every backing-store failure is carried up to the orchestrator unchanged in meaning.
//! Policy rejections ([`ShortenerError::MaliciousUrlDetected`]) and absences
//! ([`ShortenerError::ShortenedUrlNotFound`]) are kept distinct from infrastructure faults so
//! the HTTP layer can tell clients whether a retry makes sense.

use thiserror::Error;

use crate::utils::slug_codec::SlugError;

/// The sequence allocator could not hand out an id.
#[derive(Debug, Clone, Error)]
#[error("id allocation failed: {0}")]
pub struct AllocationError(pub String);

/// Errors raised by the URL store.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("shortened url not found")]
    NotFound,

    /// A unique constraint on `id` or `slug` was violated. This points to an allocator or
    /// codec defect and is never swallowed.
    #[error("duplicate key violates constraint {0}")]
    DuplicateKey(String),

    #[error("database error: {0}")]
    Database(String),
}

/// Errors raised by the blocklist store backing the guardian.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("blocklist cache unavailable: {0}")]
    Unavailable(String),

    #[error("blocklist cache holds invalid data: {0}")]
    InvalidData(String),
}

/// Errors raised while fetching the threat feed.
#[derive(Debug, Clone, Error)]
pub enum FeedError {
    #[error("threat feed request failed: {0}")]
    Request(String),

    #[error("threat feed responded with status {0}")]
    Status(u16),

    #[error("threat feed payload is malformed: {0}")]
    Malformed(String),

    #[error("threat feed returned an empty snapshot")]
    EmptySnapshot,
}

/// Errors raised by a guardian refresh cycle.
#[derive(Debug, Clone, Error)]
pub enum GuardianError {
    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Feed(#[from] FeedError),
}

/// Errors surfaced by [`crate::application::services::ShortenerService`].
#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("malicious URL detected")]
    MaliciousUrlDetected,

    #[error("the given slug doesn't represent a base62 encoded id: {0}")]
    IllegalSlug(#[from] SlugError),

    #[error("shortened url not found")]
    ShortenedUrlNotFound,

    #[error(transparent)]
    Guardian(#[from] CacheError),

    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ShortenerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::ShortenedUrlNotFound,
            other => Self::Store(other),
        }
    }
}
