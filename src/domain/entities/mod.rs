//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures without business logic.
//!
//! # Entity Types
//!
//! - [`ShortenedUrl`] - A persisted slug-to-URL mapping
//! - [`MaliciousUrl`] - A threat feed record
//! - [`GuardianStatus`] / [`RefreshOutcome`] - Blocklist cache state and refresh results
//!
//! Creation uses a separate `NewShortenedUrl` struct, mirroring the store contract where
//! `created_at` is assigned on insert.

pub mod guardian;
pub mod malicious_url;
pub mod shortened_url;

pub use guardian::{GuardianStatus, RefreshOutcome};
pub use malicious_url::MaliciousUrl;
pub use shortened_url::{NewShortenedUrl, ShortenedUrl};
