//! Threat feed record.

use serde::Deserialize;

/// One malicious URL as published by the threat feed.
///
/// Only `url` takes part in blocklist membership; the rest is carried for logging and the
/// admin CLI. Missing metadata fields default to empty values.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MaliciousUrl {
    pub url: String,
    #[serde(default, rename = "dateadded")]
    pub date_added: String,
    #[serde(default)]
    pub url_status: String,
    #[serde(default)]
    pub last_online: Option<String>,
    #[serde(default)]
    pub threat: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub urlhaus_link: String,
    #[serde(default)]
    pub reporter: String,
}

impl MaliciousUrl {
    /// Builds a record that only carries a URL.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            date_added: String::new(),
            url_status: String::new(),
            last_online: None,
            threat: String::new(),
            tags: None,
            urlhaus_link: String::new(),
            reporter: String::new(),
        }
    }
}
