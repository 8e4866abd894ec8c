//! URLhaus threat feed client.

use async_trait::async_trait;
use reqwest::Client;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{error, info};

use crate::domain::entities::MaliciousUrl;
use crate::domain::errors::FeedError;
use crate::domain::repositories::ThreatFeed;

/// Default URLhaus endpoint listing recently reported URLs.
pub const DEFAULT_FEED_URL: &str = "https://urlhaus.abuse.ch/downloads/json_recent/";

/// Threat feed reading the URLhaus JSON dump.
///
/// The payload is an object keyed by URLhaus entry id, each value an array of records. The
/// first record of every entry is kept.
pub struct UrlhausFeed {
    client: Client,
    endpoint: String,
}

impl UrlhausFeed {
    /// Builds a client with a whole-request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Request`] if the HTTP client cannot be constructed.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("snip/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FeedError::Request(e.to_string()))?;

        Ok(Self::with_client(client, endpoint))
    }

    /// Uses a preconfigured HTTP client.
    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

/// Parses a URLhaus JSON dump.
///
/// Entries with an empty record array are skipped.
///
/// # Errors
///
/// Returns [`FeedError::Malformed`] if `body` is not an object of record arrays.
pub fn parse_feed(body: &[u8]) -> Result<Vec<MaliciousUrl>, FeedError> {
    let entries: BTreeMap<String, Vec<MaliciousUrl>> =
        serde_json::from_slice(body).map_err(|e| FeedError::Malformed(e.to_string()))?;

    Ok(entries
        .into_values()
        .filter_map(|records| records.into_iter().next())
        .collect())
}

#[async_trait]
impl ThreatFeed for UrlhausFeed {
    async fn fetch_all(&self) -> Result<Vec<MaliciousUrl>, FeedError> {
        let response = self.client.get(&self.endpoint).send().await.map_err(|e| {
            error!(endpoint = %self.endpoint, error = %e, "Threat feed request failed");
            FeedError::Request(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            error!(endpoint = %self.endpoint, status = status.as_u16(), "Threat feed returned error status");
            return Err(FeedError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| {
            error!(endpoint = %self.endpoint, error = %e, "Failed to read threat feed body");
            FeedError::Request(e.to_string())
        })?;

        let urls = parse_feed(&body)?;
        info!(count = urls.len(), "Fetched malicious URLs");

        Ok(urls)
    }
}
