//! Redis cache backend for multi-instance deployments.

mod cache;
mod connection;
mod error;

pub use cache::RedisCache;
pub use connection::{connection_manager, CONNECT_TIMEOUT};
