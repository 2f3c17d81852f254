//! Cache-backed memory repository.
//!
//! Stores JSON copies of appointment reads in any [`Cache`] backend under
//! three key families: the raw appointment id, `user_{id}` and `salon_{id}`.
//! Every entry is written with the same TTL and repopulated lazily by the
//! service on a miss.
//!
//! [`Cache`]: appointments_core::cache::Cache

mod memory;

pub use memory::CachedAppointmentMemory;
