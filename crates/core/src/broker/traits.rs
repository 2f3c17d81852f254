use async_trait::async_trait;

use super::Result;

/// A message taken off a queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Queue the message was taken from.
    pub queue: String,
    /// Broker-assigned tag, unique per broker instance.
    pub tag: u64,
    pub body: Vec<u8>,
}

/// List key holding pending messages for `queue`.
pub fn queue_key(queue: &str) -> String {
    format!("queue:{queue}")
}

/// List key holding replies for messages taken from `queue`.
pub fn reply_key(queue: &str) -> String {
    format!("queue:{queue}:replies")
}

#[async_trait]
pub trait Broker: Send + Sync {
    /// Appends a message to `queue`.
    async fn publish(&self, queue: &str, body: &[u8]) -> Result<()>;

    /// Waits a bounded poll interval for the next message on `queue`.
    ///
    /// Returns `Ok(None)` when nothing arrived in time, so callers can check
    /// for shutdown between polls without dropping an in-flight message.
    async fn next(&self, queue: &str) -> Result<Option<Delivery>>;

    /// Publishes `body` on the reply channel of the delivery's queue.
    async fn reply(&self, delivery: &Delivery, body: &[u8]) -> Result<()>;

    /// Marks a delivery as handled. Deliveries are never requeued.
    async fn ack(&self, delivery: &Delivery) -> Result<()>;
}
