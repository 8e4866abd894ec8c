//! Blocklist cache state and refresh results.

use chrono::{DateTime, Utc};

/// Snapshot of the blocklist cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardianStatus {
    pub entries: u64,
    pub last_updated_at: Option<DateTime<Utc>>,
}

/// Result of a successful [`crate::domain::repositories::UrlGuardian::refresh_from_feed`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Another instance holds the refresh lock; nothing was fetched.
    Locked,

    /// The cache was refreshed less than the minimum interval ago; nothing was fetched.
    Skipped { last_updated_at: DateTime<Utc> },

    /// The feed was fetched and reconciled into the cache.
    Reconciled {
        fetched: usize,
        added: u64,
        evicted: u64,
    },
}

impl RefreshOutcome {
    /// Short label used for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Locked => "locked",
            Self::Skipped { .. } => "skipped",
            Self::Reconciled { .. } => "reconciled",
        }
    }
}
