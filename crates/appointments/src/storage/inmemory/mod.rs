//! In-memory durable store.
//!
//! Keeps appointments in a `HashMap` behind an `Arc<RwLock<_>>`. Every
//! operation takes the lock once, so single-record updates are atomic.
//! Data is lost when the repository is dropped.

mod repository;

pub use repository::InMemoryRepository;
