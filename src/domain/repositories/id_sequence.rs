//! Trait for the shared id sequence.

use crate::domain::errors::AllocationError;
use async_trait::async_trait;

/// Issues globally unique, strictly increasing ids.
///
/// Every value returned is greater than every value returned before it, across all
/// service instances sharing the same backing store. Implementations never retry; a
/// failed call surfaces as [`AllocationError`] and the caller decides what to do.
///
/// # Implementations
///
/// - [`crate::infrastructure::sequence::RedisIdSequence`] - Redis `INCR`, shared by instances
/// - [`crate::infrastructure::sequence::AtomicIdSequence`] - process-local, single instance only
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdSequence: Send + Sync {
    /// Allocates the next id.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError`] if the backing store is unavailable.
    async fn next_id(&self) -> Result<i64, AllocationError>;
}
