use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use appointments_core::appointment::RequestValidator;
use appointments_core::error::ErrorResponses;

use crate::config::Config;
use crate::endpoints::EndpointSet;
use crate::service::AppointmentService;

/// Application state shared by the HTTP router and the queue consumer.
#[derive(Clone)]
pub struct AppState {
    /// Use case name to endpoint dispatch table.
    pub endpoints: Arc<EndpointSet>,
    /// Error kind to user-facing message and status.
    pub errors: Arc<ErrorResponses>,
    pub validator: RequestValidator,
    /// Deadline applied to durable calls made on behalf of a request.
    pub request_timeout: Duration,
    /// Shutdown flag; flips to `true` once on Ctrl+C or SIGTERM.
    shutdown_tx: Arc<watch::Sender<bool>>,
}

impl AppState {
    /// Wires the state around an already-built service.
    pub fn build(service: Arc<dyn AppointmentService>, config: &Config) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            endpoints: Arc::new(EndpointSet::new(service)),
            errors: Arc::new(ErrorResponses::default()),
            validator: RequestValidator::new(config.allow_past_appointments),
            request_timeout: config.request_timeout(),
            shutdown_tx: Arc::new(shutdown_tx),
        }
    }

    /// Subscribe to the shutdown flag.
    pub fn subscribe_shutdown(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    /// Signal shutdown to queue workers and in-flight durable calls.
    pub fn signal_shutdown(&self) {
        self.shutdown_tx.send_replace(true);
    }
}

// ============================================================================
// Factory functions for different backend combinations
// ============================================================================

#[cfg(all(feature = "sqlite", feature = "memory"))]
mod sqlite_memory {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::log::TracingEventLog;
    use crate::service::Service;
    use crate::storage::{CachedAppointmentMemory, SqliteRepository};

    impl AppState {
        /// Creates AppState with SQLite storage and in-memory cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let sqlite_repo = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);
            let memory_cache = Arc::new(MemoryCache::new(config.cache_max_entries)?);
            let memory = Arc::new(CachedAppointmentMemory::new(
                memory_cache,
                config.cache_ttl(),
            ));

            let service = Service::new(
                Some(Arc::new(TracingEventLog)),
                Some(sqlite_repo),
                Some(memory),
            )?;

            Ok(Self::build(Arc::new(service), config))
        }
    }
}

#[cfg(all(feature = "sqlite", feature = "redis"))]
mod sqlite_redis {
    use super::*;
    use crate::cache::RedisCache;
    use crate::log::TracingEventLog;
    use crate::service::Service;
    use crate::storage::{CachedAppointmentMemory, SqliteRepository};

    impl AppState {
        /// Creates AppState with SQLite storage and Redis cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let sqlite_repo = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);
            let redis_cache = Arc::new(RedisCache::new(&config.redis_url).await?);
            let memory = Arc::new(CachedAppointmentMemory::new(
                redis_cache,
                config.cache_ttl(),
            ));

            let service = Service::new(
                Some(Arc::new(TracingEventLog)),
                Some(sqlite_repo),
                Some(memory),
            )?;

            Ok(Self::build(Arc::new(service), config))
        }
    }
}

#[cfg(all(feature = "inmemory", feature = "memory"))]
mod inmemory_memory {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::log::TracingEventLog;
    use crate::service::Service;
    use crate::storage::{CachedAppointmentMemory, InMemoryRepository};

    impl AppState {
        /// Creates AppState with in-memory storage and cache.
        /// Useful for testing without any external dependencies.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let inmemory_repo = Arc::new(InMemoryRepository::new());
            let memory_cache = Arc::new(MemoryCache::new(config.cache_max_entries)?);
            let memory = Arc::new(CachedAppointmentMemory::new(
                memory_cache,
                config.cache_ttl(),
            ));

            let service = Service::new(
                Some(Arc::new(TracingEventLog)),
                Some(inmemory_repo),
                Some(memory),
            )?;

            Ok(Self::build(Arc::new(service), config))
        }
    }
}

#[cfg(all(feature = "inmemory", feature = "redis"))]
mod inmemory_redis {
    use super::*;
    use crate::cache::RedisCache;
    use crate::log::TracingEventLog;
    use crate::service::Service;
    use crate::storage::{CachedAppointmentMemory, InMemoryRepository};

    impl AppState {
        /// Creates AppState with in-memory storage and Redis cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let inmemory_repo = Arc::new(InMemoryRepository::new());
            let redis_cache = Arc::new(RedisCache::new(&config.redis_url).await?);
            let memory = Arc::new(CachedAppointmentMemory::new(
                redis_cache,
                config.cache_ttl(),
            ));

            let service = Service::new(
                Some(Arc::new(TracingEventLog)),
                Some(inmemory_repo),
                Some(memory),
            )?;

            Ok(Self::build(Arc::new(service), config))
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_signal_shutdown_reaches_subscribers() {
        let state = AppState::default();
        let mut rx = state.subscribe_shutdown();
        assert!(!*rx.borrow());

        state.clone().signal_shutdown();

        rx.changed().await.unwrap();
        assert!(*rx.borrow());
        assert!(*state.subscribe_shutdown().borrow());
    }

    #[tokio::test]
    async fn test_build_uses_config_timeout() {
        let state = AppState::default();
        assert_eq!(state.request_timeout, Duration::from_secs(5));
    }
}
