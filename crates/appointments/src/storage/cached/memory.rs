use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use appointments_core::appointment::Appointment;
use appointments_core::cache::{
    appointment_key, deserialize_appointment, deserialize_appointments, salon_key,
    serialize_appointment, serialize_appointments, user_key, AppointmentMemory, Cache, CacheError,
    Result,
};

/// Memory repository on top of a raw key/value cache.
///
/// # Type Parameters
///
/// * `C` - The cache implementation
pub struct CachedAppointmentMemory<C>
where
    C: Cache,
{
    cache: Arc<C>,
    ttl: Duration,
}

impl<C> CachedAppointmentMemory<C>
where
    C: Cache,
{
    /// Creates a new memory repository writing entries with the given TTL.
    pub fn new(cache: Arc<C>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    async fn get_bytes(&self, key: String) -> Result<Vec<u8>> {
        self.cache.get(&key).await?.ok_or(CacheError::Miss(key))
    }

    async fn put_many(&self, key: String, appointments: &[Appointment]) -> Result<()> {
        let bytes = serialize_appointments(appointments)?;
        self.cache.set(&key, &bytes, Some(self.ttl)).await
    }
}

#[async_trait]
impl<C> AppointmentMemory for CachedAppointmentMemory<C>
where
    C: Cache + 'static,
{
    async fn get_by_id(&self, id: &str) -> Result<Appointment> {
        let bytes = self.get_bytes(appointment_key(id)).await?;
        Ok(deserialize_appointment(&bytes)?)
    }

    async fn get_by_user(&self, user_id: i64) -> Result<Vec<Appointment>> {
        let bytes = self.get_bytes(user_key(user_id)).await?;
        Ok(deserialize_appointments(&bytes)?)
    }

    async fn get_by_salon(&self, salon_id: i64) -> Result<Vec<Appointment>> {
        let bytes = self.get_bytes(salon_key(salon_id)).await?;
        Ok(deserialize_appointments(&bytes)?)
    }

    async fn put_by_id(&self, appointment: &Appointment) -> Result<()> {
        let bytes = serialize_appointment(appointment)?;
        self.cache
            .set(&appointment_key(&appointment.id), &bytes, Some(self.ttl))
            .await
    }

    async fn put_by_user(&self, user_id: i64, appointments: &[Appointment]) -> Result<()> {
        self.put_many(user_key(user_id), appointments).await
    }

    async fn put_by_salon(&self, salon_id: i64, appointments: &[Appointment]) -> Result<()> {
        self.put_many(salon_key(salon_id), appointments).await
    }
}
