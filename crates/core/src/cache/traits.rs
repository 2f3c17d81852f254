use std::time::Duration;

use async_trait::async_trait;

use crate::appointment::Appointment;

use super::Result;

/// Raw key/value cache capability.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Gets a value from the cache by key. Absent or expired keys yield `None`.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Sets a value in the cache with an optional TTL.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()>;
}

/// Fast, expiring copy of appointment reads.
///
/// `get_*` fail with `CacheError::Miss` when the key is absent or expired.
/// Callers treat every failure from this trait as recoverable.
#[async_trait]
pub trait AppointmentMemory: Send + Sync {
    async fn get_by_id(&self, id: &str) -> Result<Appointment>;

    async fn get_by_user(&self, user_id: i64) -> Result<Vec<Appointment>>;

    async fn get_by_salon(&self, salon_id: i64) -> Result<Vec<Appointment>>;

    async fn put_by_id(&self, appointment: &Appointment) -> Result<()>;

    async fn put_by_user(&self, user_id: i64, appointments: &[Appointment]) -> Result<()>;

    async fn put_by_salon(&self, salon_id: i64, appointments: &[Appointment]) -> Result<()>;
}
