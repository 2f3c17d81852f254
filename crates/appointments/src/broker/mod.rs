//! Broker backends for the work queues.
//!
//! Implementations of `appointments_core::broker::Broker`, selected by the
//! same feature flags as the cache backend: `memory` keeps queues in-process,
//! `redis` uses Redis lists.

use std::sync::Arc;
use std::time::Duration;

use appointments_core::broker::{Broker, BrokerError};

use crate::config::Config;

#[cfg(any(feature = "memory", test))]
pub mod memory;

#[cfg(feature = "redis")]
pub mod redis_impl;

#[cfg(any(feature = "memory", test))]
pub use memory::MemoryBroker;

#[cfg(feature = "redis")]
pub use redis_impl::RedisBroker;

/// How long `Broker::next` waits before reporting an empty poll.
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Creates the in-process broker.
#[cfg(feature = "memory")]
pub async fn connect(_config: &Config) -> Result<Arc<dyn Broker>, BrokerError> {
    tracing::warn!("Using the in-process broker; queues only receive messages published by this process");
    Ok(Arc::new(MemoryBroker::new()))
}

/// Connects to the Redis broker at `REDIS_URL`.
#[cfg(feature = "redis")]
pub async fn connect(config: &Config) -> Result<Arc<dyn Broker>, BrokerError> {
    Ok(Arc::new(RedisBroker::new(&config.redis_url).await?))
}
