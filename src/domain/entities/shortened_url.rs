//! Shortened URL entity representing a slug-to-URL mapping.

use chrono::{DateTime, Utc};

/// A persisted mapping between an allocated id, its slug and the original URL.
///
/// Records are created once by a successful shorten and never modified afterwards.
/// `slug` is always the base62 encoding of `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenedUrl {
    pub id: i64,
    pub slug: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
}

impl ShortenedUrl {
    /// Creates a new ShortenedUrl instance.
    pub fn new(id: i64, slug: String, original_url: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            slug,
            original_url,
            created_at,
        }
    }
}

/// Input data for persisting a new mapping. `created_at` is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShortenedUrl {
    pub id: i64,
    pub slug: String,
    pub original_url: String,
}

impl NewShortenedUrl {
    /// Turns the input into a stored record stamped with `created_at`.
    pub fn into_record(self, created_at: DateTime<Utc>) -> ShortenedUrl {
        ShortenedUrl::new(self.id, self.slug, self.original_url, created_at)
    }
}
