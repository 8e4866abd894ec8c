//! Trait for the external threat feed.

use crate::domain::entities::MaliciousUrl;
use crate::domain::errors::FeedError;
use async_trait::async_trait;

/// Read-only source of the complete current blocklist.
///
/// Each call returns a full snapshot. Anything absent from the snapshot is treated as
/// retracted by the guardian, so a paginated or partial feed must not implement this trait.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ThreatFeed: Send + Sync {
    /// Fetches the full snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError`] on network failures, non-2xx responses and malformed payloads.
    async fn fetch_all(&self) -> Result<Vec<MaliciousUrl>, FeedError>;
}
