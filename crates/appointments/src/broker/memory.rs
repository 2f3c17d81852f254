//! In-process broker.
//!
//! Every queue and every reply channel is an unbounded tokio mpsc channel,
//! created on first use. Useful for single-process deployments and tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex, RwLock};

use appointments_core::broker::{Broker, BrokerError, Delivery, Result};

use super::POLL_INTERVAL;

#[derive(Debug)]
struct Channel {
    tx: mpsc::UnboundedSender<Vec<u8>>,
    rx: Mutex<mpsc::UnboundedReceiver<Vec<u8>>>,
}

impl Channel {
    fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: Mutex::new(rx),
        }
    }

    fn send(&self, name: &str, body: &[u8]) -> Result<()> {
        self.tx
            .send(body.to_vec())
            .map_err(|_| BrokerError::Closed(name.to_string()))
    }

    async fn recv_timeout(&self, timeout: Duration) -> Option<Vec<u8>> {
        let mut rx = self.rx.lock().await;
        tokio::time::timeout(timeout, rx.recv()).await.ok().flatten()
    }
}

type Channels = Arc<RwLock<HashMap<String, Arc<Channel>>>>;

/// In-process broker backed by tokio channels.
#[derive(Debug, Clone, Default)]
pub struct MemoryBroker {
    queues: Channels,
    replies: Channels,
    next_tag: Arc<AtomicU64>,
    acked: Arc<AtomicUsize>,
}

impl MemoryBroker {
    pub fn new() -> Self {
        Self::default()
    }

    async fn channel(channels: &Channels, name: &str) -> Arc<Channel> {
        {
            let channels = channels.read().await;
            if let Some(channel) = channels.get(name) {
                return channel.clone();
            }
        }

        let mut channels = channels.write().await;
        channels
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Channel::new()))
            .clone()
    }

    /// Waits up to `timeout` for the next reply published for `queue`.
    pub async fn next_reply(&self, queue: &str, timeout: Duration) -> Option<Vec<u8>> {
        Self::channel(&self.replies, queue)
            .await
            .recv_timeout(timeout)
            .await
    }

    /// Number of deliveries acknowledged so far.
    pub fn acked(&self) -> usize {
        self.acked.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Broker for MemoryBroker {
    async fn publish(&self, queue: &str, body: &[u8]) -> Result<()> {
        Self::channel(&self.queues, queue).await.send(queue, body)
    }

    async fn next(&self, queue: &str) -> Result<Option<Delivery>> {
        let channel = Self::channel(&self.queues, queue).await;
        let delivery = channel
            .recv_timeout(POLL_INTERVAL)
            .await
            .map(|body| Delivery {
                queue: queue.to_string(),
                tag: self.next_tag.fetch_add(1, Ordering::SeqCst),
                body,
            });
        Ok(delivery)
    }

    async fn reply(&self, delivery: &Delivery, body: &[u8]) -> Result<()> {
        Self::channel(&self.replies, &delivery.queue)
            .await
            .send(&delivery.queue, body)
    }

    async fn ack(&self, _delivery: &Delivery) -> Result<()> {
        self.acked.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_then_next() {
        let broker = MemoryBroker::new();
        broker.publish("create", b"first").await.unwrap();
        broker.publish("create", b"second").await.unwrap();

        let first = broker.next("create").await.unwrap().unwrap();
        let second = broker.next("create").await.unwrap().unwrap();

        assert_eq!(first.body, b"first");
        assert_eq!(first.queue, "create");
        assert_eq!(second.body, b"second");
        assert_ne!(first.tag, second.tag);
    }

    #[tokio::test]
    async fn test_next_on_empty_queue_returns_none() {
        let broker = MemoryBroker::new();
        assert!(broker.next("assign").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_queues_are_isolated() {
        let broker = MemoryBroker::new();
        broker.publish("create", b"payload").await.unwrap();

        assert!(broker.next("assign").await.unwrap().is_none());
        assert!(broker.next("create").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_reply_and_ack() {
        let broker = MemoryBroker::new();
        broker.publish("make", b"{}").await.unwrap();
        let delivery = broker.next("make").await.unwrap().unwrap();

        broker.reply(&delivery, b"done").await.unwrap();
        broker.ack(&delivery).await.unwrap();

        let reply = broker
            .next_reply("make", Duration::from_millis(100))
            .await
            .unwrap();
        assert_eq!(reply, b"done");
        assert_eq!(broker.acked(), 1);
        assert!(broker
            .next_reply("create", Duration::from_millis(10))
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_clones_share_queues() {
        let broker = MemoryBroker::new();
        let producer = broker.clone();
        producer.publish("create", b"shared").await.unwrap();

        let delivery = broker.next("create").await.unwrap().unwrap();
        assert_eq!(delivery.body, b"shared");
    }
}
