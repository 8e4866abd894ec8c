//! Blocklist storage for the guardian.
//!
//! Provides two [`crate::domain::repositories::BlocklistStore`] implementations:
//! - [`RedisBlocklistStore`] - Production store shared by every instance
//! - [`InMemoryBlocklistStore`] - Process-local store for tests and local development

mod memory_blocklist;
mod redis_blocklist;

pub use memory_blocklist::InMemoryBlocklistStore;
pub use redis_blocklist::RedisBlocklistStore;
