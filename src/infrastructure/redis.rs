//! Shared Redis connection setup.

use redis::{AsyncCommands, Client, RedisError, aio::ConnectionManager};
use tracing::info;

/// Connects to Redis and validates the connection with a PING.
///
/// The returned `ConnectionManager` reconnects on its own and is cheap to clone, so one
/// manager is shared by the id sequence and the blocklist store.
///
/// # Errors
///
/// Returns the underlying [`RedisError`] if the URL is invalid, the connection cannot be
/// established, or the PING fails.
pub async fn connect(redis_url: &str) -> Result<ConnectionManager, RedisError> {
    info!("Connecting to Redis");

    let client = Client::open(redis_url)?;
    let manager = ConnectionManager::new(client).await?;

    let mut test_conn = manager.clone();
    test_conn.ping::<()>().await?;

    info!("✓ Connected to Redis");

    Ok(manager)
}
