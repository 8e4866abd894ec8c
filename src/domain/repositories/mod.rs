//! Repository and collaborator trait definitions for the domain layer.
//!
//! These traits abstract every backing technology the engine touches. Concrete adapters
//! live in `crate::infrastructure`; the guardian itself lives in
//! `crate::application::services`.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Every trait has a production adapter and an in-memory adapter
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Traits
//!
//! - [`UrlRepository`] - Shortened URL persistence
//! - [`IdSequence`] - Shared id allocation
//! - [`BlocklistStore`] - Blocklist sets and refresh bookkeeping
//! - [`ThreatFeed`] - External malicious-URL feed
//! - [`UrlGuardian`] - Blocklist membership and refresh lifecycle

pub mod blocklist_store;
pub mod id_sequence;
pub mod threat_feed;
pub mod url_guardian;
pub mod url_repository;

pub use blocklist_store::BlocklistStore;
pub use id_sequence::IdSequence;
pub use threat_feed::ThreatFeed;
pub use url_guardian::UrlGuardian;
pub use url_repository::UrlRepository;

#[cfg(test)]
pub use blocklist_store::MockBlocklistStore;
#[cfg(test)]
pub use id_sequence::MockIdSequence;
#[cfg(test)]
pub use threat_feed::MockThreatFeed;
#[cfg(test)]
pub use url_guardian::MockUrlGuardian;
#[cfg(test)]
pub use url_repository::MockUrlRepository;
