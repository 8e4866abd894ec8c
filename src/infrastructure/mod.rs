//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`cache`] - Blocklist stores (Redis and in-memory)
//! - [`feed`] - Threat feed HTTP client
//! - [`persistence`] - URL repositories (PostgreSQL and in-memory)
//! - [`redis`] - Shared Redis connection setup
//! - [`sequence`] - Id sequences (Redis and atomic)

pub mod cache;
pub mod feed;
pub mod persistence;
pub mod redis;
pub mod sequence;
