//! Redis list broker.
//!
//! Producers `RPUSH` onto `queue:{name}`; the consumer `BLPOP`s from it and
//! `RPUSH`es replies onto `queue:{name}:replies`. Popping removes the message,
//! so acknowledging is a no-op.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tokio::sync::Mutex;

use appointments_core::broker::{queue_key, reply_key, Broker, BrokerError, Delivery, Result};

use super::POLL_INTERVAL;
use crate::cache::redis_impl::{connection_manager, CONNECT_TIMEOUT};

/// Maps Redis errors to BrokerError.
pub fn map_broker_error(err: redis::RedisError) -> BrokerError {
    if err.is_connection_refusal()
        || err.is_timeout()
        || err.is_connection_dropped()
        || err.is_io_error()
    {
        BrokerError::ConnectionFailed(err.to_string())
    } else {
        BrokerError::OperationFailed(err.to_string())
    }
}

/// Redis broker backend.
///
/// Blocking pops run on a dedicated connection per queue so they never stall
/// publishes and replies on the shared connection.
pub struct RedisBroker {
    client: redis::Client,
    conn: ConnectionManager,
    blocking: Mutex<HashMap<String, ConnectionManager>>,
    next_tag: AtomicU64,
}

impl RedisBroker {
    /// Connects to Redis.
    ///
    /// # Errors
    ///
    /// Returns `BrokerError::ConnectionFailed` if the connection cannot be established.
    pub async fn new(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(map_broker_error)?;
        let conn = connection_manager(client.clone(), CONNECT_TIMEOUT)
            .await
            .map_err(map_broker_error)?;
        Ok(Self {
            client,
            conn,
            blocking: Mutex::new(HashMap::new()),
            next_tag: AtomicU64::new(0),
        })
    }

    async fn blocking_connection(&self, queue: &str) -> Result<ConnectionManager> {
        let mut blocking = self.blocking.lock().await;
        if let Some(conn) = blocking.get(queue) {
            return Ok(conn.clone());
        }
        let conn = connection_manager(self.client.clone(), CONNECT_TIMEOUT)
            .await
            .map_err(map_broker_error)?;
        blocking.insert(queue.to_string(), conn.clone());
        Ok(conn)
    }
}

#[async_trait]
impl Broker for RedisBroker {
    async fn publish(&self, queue: &str, body: &[u8]) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.rpush::<_, _, ()>(queue_key(queue), body)
            .await
            .map_err(map_broker_error)
    }

    async fn next(&self, queue: &str) -> Result<Option<Delivery>> {
        let mut conn = self.blocking_connection(queue).await?;
        let popped: Option<(String, Vec<u8>)> = redis::cmd("BLPOP")
            .arg(queue_key(queue))
            .arg(POLL_INTERVAL.as_secs_f64())
            .query_async(&mut conn)
            .await
            .map_err(map_broker_error)?;

        Ok(popped.map(|(_, body)| Delivery {
            queue: queue.to_string(),
            tag: self.next_tag.fetch_add(1, Ordering::SeqCst),
            body,
        }))
    }

    async fn reply(&self, delivery: &Delivery, body: &[u8]) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.rpush::<_, _, ()>(reply_key(&delivery.queue), body)
            .await
            .map_err(map_broker_error)
    }

    async fn ack(&self, delivery: &Delivery) -> Result<()> {
        tracing::trace!(queue = %delivery.queue, tag = delivery.tag, "Delivery acknowledged");
        Ok(())
    }
}
