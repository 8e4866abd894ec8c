//! Redis `INCR` id sequence.

use async_trait::async_trait;
use redis::{AsyncCommands, aio::ConnectionManager};
use tracing::error;

use crate::domain::errors::AllocationError;
use crate::domain::repositories::IdSequence;

/// Id sequence backed by a single Redis counter.
///
/// `INCR` is atomic on the server, so every instance sharing the key gets distinct,
/// strictly increasing ids. A missing key starts the sequence at 1.
#[derive(Clone)]
pub struct RedisIdSequence {
    conn: ConnectionManager,
    key: String,
}

impl RedisIdSequence {
    /// Creates a sequence on the default `snip:sequence:shortened_url` key.
    pub fn new(conn: ConnectionManager) -> Self {
        Self::with_key(conn, "snip:sequence:shortened_url")
    }

    /// Creates a sequence on a custom key.
    pub fn with_key(conn: ConnectionManager, key: impl Into<String>) -> Self {
        Self {
            conn,
            key: key.into(),
        }
    }
}

#[async_trait]
impl IdSequence for RedisIdSequence {
    async fn next_id(&self) -> Result<i64, AllocationError> {
        let mut conn = self.conn.clone();
        conn.incr::<_, _, i64>(&self.key, 1).await.map_err(|e| {
            error!(key = %self.key, error = %e, "Redis INCR failed");
            AllocationError(e.to_string())
        })
    }
}
