//! [`crate::domain::repositories::ThreatFeed`] implementations.

pub mod urlhaus_client;

pub use urlhaus_client::{DEFAULT_FEED_URL, UrlhausFeed, parse_feed};
