//! Bounded Redis connection setup.

use std::time::Duration;

use redis::aio::ConnectionManager;

/// Upper bound on establishing a connection manager.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Opens a connection manager, failing with a timeout error after `timeout`.
///
/// `ConnectionManager::new` retries on its own while the server is down, so
/// the connect is bounded here.
pub async fn connection_manager(
    client: redis::Client,
    timeout: Duration,
) -> redis::RedisResult<ConnectionManager> {
    match tokio::time::timeout(timeout, ConnectionManager::new(client)).await {
        Ok(result) => result,
        Err(_) => Err(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            format!("no Redis connection after {}s", timeout.as_secs_f64()),
        )
        .into()),
    }
}
