//! Shorten and resolve orchestration.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::entities::NewShortenedUrl;
use crate::domain::errors::{AllocationError, ShortenerError};
use crate::domain::repositories::{IdSequence, UrlGuardian, UrlRepository};
use crate::utils::slug_codec;

/// Service composing the guardian, the id sequence, the slug codec and the URL store.
///
/// Both operations are single-pass pipelines. Nothing is retried here: every failure of a
/// collaborator is returned to the caller, and an unanswered guardian check is a failure,
/// never a pass.
pub struct ShortenerService {
    hostname: String,
    guardian: Arc<dyn UrlGuardian>,
    sequence: Arc<dyn IdSequence>,
    repository: Arc<dyn UrlRepository>,
}

impl ShortenerService {
    /// Creates a new shortener service.
    ///
    /// `hostname` is the public prefix of generated short URLs, e.g. `https://snip.to`.
    pub fn new(
        hostname: impl Into<String>,
        guardian: Arc<dyn UrlGuardian>,
        sequence: Arc<dyn IdSequence>,
        repository: Arc<dyn UrlRepository>,
    ) -> Self {
        Self {
            hostname: hostname.into().trim_end_matches('/').to_string(),
            guardian,
            sequence,
            repository,
        }
    }

    /// Shortens `url` and returns the full short URL.
    ///
    /// `url` is expected to be a validated http(s) URL.
    ///
    /// # Errors
    ///
    /// - [`ShortenerError::MaliciousUrlDetected`] if the URL is blocklisted (no id is
    ///   allocated and nothing is written)
    /// - [`ShortenerError::Guardian`] if the blocklist cannot be consulted
    /// - [`ShortenerError::Allocation`] if no id could be allocated
    /// - [`ShortenerError::Store`] if the mapping could not be persisted
    pub async fn shorten(&self, url: &str) -> Result<String, ShortenerError> {
        if !self.guardian.safe_url(url).await? {
            warn!(url, "Rejected malicious URL");
            metrics::counter!("snip_urls_rejected_total").increment(1);
            return Err(ShortenerError::MaliciousUrlDetected);
        }

        let id = self.sequence.next_id().await?;
        let encodable = u64::try_from(id)
            .ok()
            .filter(|&id| id > 0)
            .ok_or_else(|| AllocationError(format!("sequence returned non-positive id {id}")))?;
        let slug = slug_codec::encode(encodable);

        let record = self
            .repository
            .save(&NewShortenedUrl {
                id,
                slug,
                original_url: url.to_string(),
            })
            .await?;

        info!(id = record.id, slug = %record.slug, "Shortened URL");
        metrics::counter!("snip_urls_shortened_total").increment(1);

        Ok(self.short_url(&record.slug))
    }

    /// Resolves a slug to the original URL.
    ///
    /// # Errors
    ///
    /// - [`ShortenerError::IllegalSlug`] if `slug` is not a canonical base62 id
    /// - [`ShortenerError::ShortenedUrlNotFound`] if no mapping exists
    /// - [`ShortenerError::Store`] on store failures
    pub async fn resolve(&self, slug: &str) -> Result<String, ShortenerError> {
        let decoded = slug_codec::decode(slug)?;
        let id = i64::try_from(decoded)
            .map_err(|_| ShortenerError::IllegalSlug(slug_codec::SlugError::Overflow))?;

        let record = self.repository.find(id).await?;
        debug!(id, slug, "Resolved slug");
        metrics::counter!("snip_urls_resolved_total").increment(1);

        Ok(record.original_url)
    }

    /// Builds the public short URL for a slug.
    pub fn short_url(&self, slug: &str) -> String {
        format!("{}/{}", self.hostname, slug)
    }
}
