//! Process-local id sequence.

use async_trait::async_trait;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::errors::AllocationError;
use crate::domain::repositories::IdSequence;

/// Id sequence held in an atomic counter.
///
/// Only correct for a single process; ids restart after a restart.
#[derive(Debug, Default)]
pub struct AtomicIdSequence {
    current: AtomicI64,
}

impl AtomicIdSequence {
    /// Creates a sequence whose first id is 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sequence whose first id is `last + 1`.
    pub fn starting_after(last: i64) -> Self {
        Self {
            current: AtomicI64::new(last),
        }
    }
}

#[async_trait]
impl IdSequence for AtomicIdSequence {
    async fn next_id(&self) -> Result<i64, AllocationError> {
        // Never wraps: once exhausted, every later call fails too.
        self.current
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                current.checked_add(1)
            })
            .map(|previous| previous + 1)
            .map_err(|_| AllocationError("sequence exhausted".to_string()))
    }
}
