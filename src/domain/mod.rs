//! Domain layer containing business entities and contracts.
//!
//! Defines entities, error taxonomy, and the traits every backing technology has to
//! satisfy, independent of infrastructure concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`errors`] - Error taxonomy shared by all layers below HTTP
//! - [`repositories`] - Store, sequence, blocklist and feed trait definitions
//! - [`refresh_worker`] - Periodic blocklist refresh task
//!
//! # Shorten Flow
//!
//! 1. Guardian checks the URL against the blocklist
//! 2. The shared sequence allocates an id
//! 3. The id is encoded as a base62 slug ([`crate::utils::slug_codec`])
//! 4. The mapping is persisted via [`repositories::UrlRepository`]

pub mod entities;
pub mod errors;
pub mod refresh_worker;
pub mod repositories;
