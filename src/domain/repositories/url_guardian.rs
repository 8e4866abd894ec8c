//! Trait for the malicious-URL guardian.

use crate::domain::entities::{GuardianStatus, RefreshOutcome};
use crate::domain::errors::{CacheError, GuardianError};
use async_trait::async_trait;

/// Membership checks against the blocklist and its refresh lifecycle.
///
/// # Implementations
///
/// - [`crate::application::services::GuardianService`] - Blocklist store + threat feed
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlGuardian: Send + Sync {
    /// Returns true if `url` is absent from the blocklist.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the blocklist cannot be read. Callers must treat this
    /// as a failure, never as "safe".
    async fn safe_url(&self, url: &str) -> Result<bool, CacheError>;

    /// Runs one reconcile cycle against the threat feed.
    ///
    /// # Errors
    ///
    /// Returns [`GuardianError::Feed`] when the feed cannot be fetched (the cache is left
    /// untouched) and [`GuardianError::Cache`] on blocklist store failures.
    async fn refresh_from_feed(&self) -> Result<RefreshOutcome, GuardianError>;

    /// Reports the number of blocklisted entries and the last refresh time.
    async fn status(&self) -> Result<GuardianStatus, CacheError>;
}
