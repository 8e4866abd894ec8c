//! Redis-backed blocklist store.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use redis::{AsyncCommands, RedisError, aio::ConnectionManager};
use std::time::Duration;
use tracing::{debug, error, trace};

use crate::domain::errors::CacheError;
use crate::domain::repositories::BlocklistStore;

/// Lifetime of a cycle's marker set, so a crashed cycle does not leave it behind.
const MARKER_TTL: Duration = Duration::from_secs(60 * 60);

/// Deletes the lock only if it still carries our token.
const RELEASE_LOCK_SCRIPT: &str = r#"
if redis.call("GET", KEYS[1]) == ARGV[1] then
    return redis.call("DEL", KEYS[1])
else
    return 0
end
"#;

/// Blocklist store on Redis sets.
///
/// # Keys
///
/// - `{prefix}malicious_urls` - live set (`SISMEMBER` for checks)
/// - `{prefix}malicious_urls:refreshed:{cycle}` - marker set of one reconcile cycle, expires
///   after an hour
/// - `{prefix}last_updated_at` - RFC 3339 timestamp of the last reconcile
/// - `{prefix}refresh_lock` - `SET NX PX` lock serializing refreshes across instances
///
/// Batches are written to the live and marker sets in one `MULTI`/`EXEC` transaction.
#[derive(Clone)]
pub struct RedisBlocklistStore {
    conn: ConnectionManager,
    live_key: String,
    refreshed_prefix: String,
    last_updated_key: String,
    lock_key: String,
}

fn map_redis_error(operation: &str, err: RedisError) -> CacheError {
    error!(operation, error = %err, "Redis blocklist operation failed");
    CacheError::Unavailable(format!("{operation}: {err}"))
}

impl RedisBlocklistStore {
    /// Creates a store using the default `snip:guardian:` key prefix.
    pub fn new(conn: ConnectionManager) -> Self {
        Self::with_prefix(conn, "snip:guardian:")
    }

    /// Creates a store with a custom key prefix (e.g. `"staging:guardian:"`).
    pub fn with_prefix(conn: ConnectionManager, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            conn,
            live_key: format!("{prefix}malicious_urls"),
            refreshed_prefix: format!("{prefix}malicious_urls:refreshed:"),
            last_updated_key: format!("{prefix}last_updated_at"),
            lock_key: format!("{prefix}refresh_lock"),
        }
    }

    fn refreshed_key(&self, cycle: &str) -> String {
        format!("{}{cycle}", self.refreshed_prefix)
    }
}

#[async_trait]
impl BlocklistStore for RedisBlocklistStore {
    async fn contains(&self, url: &str) -> Result<bool, CacheError> {
        let mut conn = self.conn.clone();
        conn.sismember::<_, _, bool>(&self.live_key, url)
            .await
            .map_err(|e| map_redis_error("SISMEMBER", e))
    }

    async fn add_entries(&self, cycle: &str, urls: &[String]) -> Result<u64, CacheError> {
        if urls.is_empty() {
            return Ok(0);
        }

        let refreshed_key = self.refreshed_key(cycle);
        let mut conn = self.conn.clone();
        let (added,): (u64,) = redis::pipe()
            .atomic()
            .sadd(&self.live_key, urls)
            .sadd(&refreshed_key, urls)
            .ignore()
            .pexpire(&refreshed_key, MARKER_TTL.as_millis() as i64)
            .ignore()
            .query_async(&mut conn)
            .await
            .map_err(|e| map_redis_error("SADD", e))?;

        trace!(batch = urls.len(), added, "Added blocklist batch");
        Ok(added)
    }

    async fn stale_entries(&self, cycle: &str) -> Result<Vec<String>, CacheError> {
        let refreshed_key = self.refreshed_key(cycle);
        let mut conn = self.conn.clone();
        conn.sdiff::<_, Vec<String>>(&[self.live_key.as_str(), refreshed_key.as_str()][..])
            .await
            .map_err(|e| map_redis_error("SDIFF", e))
    }

    async fn remove_entries(&self, urls: &[String]) -> Result<u64, CacheError> {
        if urls.is_empty() {
            return Ok(0);
        }

        let mut conn = self.conn.clone();
        conn.srem::<_, _, u64>(&self.live_key, urls)
            .await
            .map_err(|e| map_redis_error("SREM", e))
    }

    async fn clear_refreshed(&self, cycle: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(self.refreshed_key(cycle))
            .await
            .map_err(|e| map_redis_error("DEL", e))
    }

    async fn entry_count(&self) -> Result<u64, CacheError> {
        let mut conn = self.conn.clone();
        conn.scard::<_, u64>(&self.live_key)
            .await
            .map_err(|e| map_redis_error("SCARD", e))
    }

    async fn last_updated_at(&self) -> Result<Option<DateTime<Utc>>, CacheError> {
        let mut conn = self.conn.clone();
        let raw = conn
            .get::<_, Option<String>>(&self.last_updated_key)
            .await
            .map_err(|e| map_redis_error("GET", e))?;

        raw.map(|value| {
            DateTime::parse_from_rfc3339(&value)
                .map(|at| at.with_timezone(&Utc))
                .map_err(|e| {
                    CacheError::InvalidData(format!(
                        "invalid value for key '{}': {e}",
                        self.last_updated_key
                    ))
                })
        })
        .transpose()
    }

    async fn set_last_updated_at(&self, at: DateTime<Utc>) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(
            &self.last_updated_key,
            at.to_rfc3339_opts(SecondsFormat::Secs, true),
        )
        .await
        .map_err(|e| map_redis_error("SET", e))
    }

    async fn try_acquire_refresh_lock(
        &self,
        token: &str,
        ttl: Duration,
    ) -> Result<bool, CacheError> {
        let mut conn = self.conn.clone();
        let reply: Option<String> = redis::cmd("SET")
            .arg(&self.lock_key)
            .arg(token)
            .arg("NX")
            .arg("PX")
            .arg(ttl.as_millis() as u64)
            .query_async(&mut conn)
            .await
            .map_err(|e| map_redis_error("SET NX", e))?;

        let acquired = reply.is_some();
        debug!(acquired, "Refresh lock attempt");
        Ok(acquired)
    }

    async fn release_refresh_lock(&self, token: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let _released: i64 = redis::cmd("EVAL")
            .arg(RELEASE_LOCK_SCRIPT)
            .arg(1)
            .arg(&self.lock_key)
            .arg(token)
            .query_async(&mut conn)
            .await
            .map_err(|e| map_redis_error("EVAL", e))?;

        Ok(())
    }
}
