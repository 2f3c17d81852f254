//! Appointment use cases.
//!
//! Reads keyed by id, user or salon are served cache-aside: the memory
//! repository is consulted first, a miss or cache failure falls through to
//! the durable repository, and the durable result is written back
//! best-effort. Every other operation goes straight to the durable store.
//!
//! Writes do not touch the cache. A record changed through `update`,
//! `assign` or `cancel` can therefore be served stale from memory until its
//! entry's TTL runs out.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use appointments_core::appointment::{
    new_appointment, new_response, new_response_slice, AppResponse, Appointment,
    UpsertAppointment, ValidationError,
};
use appointments_core::cache::{AppointmentMemory, CacheError};
use appointments_core::context::Context;
use appointments_core::error::{AppointmentError, Result};
use appointments_core::log::{EventLog, NoopEventLog};
use appointments_core::storage::{self, AppointmentRepository};

/// Business operations exposed to the endpoints.
#[async_trait]
pub trait AppointmentService: Send + Sync {
    async fn create_appointment(
        &self,
        ctx: &Context,
        dto: UpsertAppointment,
    ) -> Result<AppResponse>;

    async fn update_appointment(
        &self,
        ctx: &Context,
        dto: UpsertAppointment,
    ) -> Result<AppResponse>;

    async fn find_all(&self, ctx: &Context) -> Result<Vec<AppResponse>>;

    async fn find_by_id(&self, ctx: &Context, id: &str) -> Result<AppResponse>;

    async fn find_by_user_id(&self, ctx: &Context, user_id: i64) -> Result<Vec<AppResponse>>;

    async fn find_by_salon_id(&self, ctx: &Context, salon_id: i64) -> Result<Vec<AppResponse>>;

    async fn find_available(&self, ctx: &Context) -> Result<Vec<AppResponse>>;

    async fn assign_appointment(
        &self,
        ctx: &Context,
        id: &str,
        user_id: i64,
    ) -> Result<AppResponse>;

    async fn cancel_appointment(
        &self,
        ctx: &Context,
        id: &str,
        user_id: i64,
    ) -> Result<AppResponse>;

    async fn delete_appointment(&self, ctx: &Context, id: &str) -> Result<()>;
}

/// Default [`AppointmentService`] over a durable and an optional memory repository.
pub struct Service {
    repository: Arc<dyn AppointmentRepository>,
    memory: Option<Arc<dyn AppointmentMemory>>,
    log: Arc<dyn EventLog>,
}

impl Service {
    /// Creates a service.
    ///
    /// The durable repository is required; without a memory repository every
    /// read goes to the durable store, and without a log failures are only
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns `AppointmentError::EmptyRepository` if `repository` is `None`.
    pub fn new(
        log: Option<Arc<dyn EventLog>>,
        repository: Option<Arc<dyn AppointmentRepository>>,
        memory: Option<Arc<dyn AppointmentMemory>>,
    ) -> Result<Self> {
        let repository = repository.ok_or(AppointmentError::EmptyRepository)?;
        Ok(Self {
            repository,
            memory,
            log: log.unwrap_or_else(|| Arc::new(NoopEventLog)),
        })
    }

    /// Logs a failure and hands it back. Log sink failures are dropped.
    fn record(&self, err: AppointmentError) -> AppointmentError {
        let _ = self.log.log_with_time(&err);
        err
    }

    /// Runs a durable-store call bounded by the context.
    async fn durable<T, F>(&self, ctx: &Context, call: F) -> Result<T>
    where
        T: Send,
        F: Future<Output = storage::Result<T>> + Send,
    {
        ctx.run(async { call.await.map_err(AppointmentError::from) })
            .await
            .map_err(|err| self.record(err))
    }

    /// Handles a failed memory lookup. Misses are expected; anything else is logged.
    fn memory_failed(&self, key: &str, err: CacheError) {
        if err.is_miss() {
            tracing::trace!(key, "Cache miss for appointments");
        } else {
            tracing::warn!(key, error = %err, "Memory repository read failed");
            self.record(err.into());
        }
    }

    /// Handles a failed memory write. Never fails the caller.
    fn put_failed(&self, key: &str, err: CacheError) {
        tracing::warn!(key, error = %err, "Failed to cache appointments");
        self.record(err.into());
    }
}

#[async_trait]
impl AppointmentService for Service {
    async fn create_appointment(
        &self,
        ctx: &Context,
        dto: UpsertAppointment,
    ) -> Result<AppResponse> {
        let appointment = new_appointment(dto);
        let created = self
            .durable(ctx, self.repository.create(&appointment))
            .await?;

        tracing::debug!(appointment_id = %created.id, salon_id = created.salon_id, "Appointment created");
        Ok(new_response(created))
    }

    async fn update_appointment(
        &self,
        ctx: &Context,
        dto: UpsertAppointment,
    ) -> Result<AppResponse> {
        let Some(id) = dto.id.clone() else {
            return Err(self.record(ValidationError::MissingId.into()));
        };
        let appointment = new_appointment(dto);
        let updated = self
            .durable(ctx, self.repository.update(&id, &appointment))
            .await?;

        tracing::debug!(appointment_id = %id, "Appointment updated");
        Ok(new_response(updated))
    }

    async fn find_all(&self, ctx: &Context) -> Result<Vec<AppResponse>> {
        let appointments = self.durable(ctx, self.repository.find_all()).await?;
        Ok(new_response_slice(&appointments))
    }

    async fn find_by_id(&self, ctx: &Context, id: &str) -> Result<AppResponse> {
        if let Some(memory) = &self.memory {
            match memory.get_by_id(id).await {
                Ok(appointment) => {
                    tracing::trace!(appointment_id = %id, "Cache hit for appointment");
                    return Ok(new_response(appointment));
                }
                Err(err) => self.memory_failed(id, err),
            }
        }

        let appointment = self.durable(ctx, self.repository.find_by_id(id)).await?;

        if let Some(memory) = &self.memory {
            if let Err(err) = memory.put_by_id(&appointment).await {
                self.put_failed(id, err);
            }
        }

        Ok(new_response(appointment))
    }

    async fn find_by_user_id(&self, ctx: &Context, user_id: i64) -> Result<Vec<AppResponse>> {
        let key = format!("user {user_id}");

        if let Some(memory) = &self.memory {
            match memory.get_by_user(user_id).await {
                Ok(appointments) => {
                    tracing::trace!(
                        user_id,
                        count = appointments.len(),
                        "Cache hit for user appointments"
                    );
                    return Ok(new_response_slice(&appointments));
                }
                Err(err) => self.memory_failed(&key, err),
            }
        }

        let appointments = self
            .durable(ctx, self.repository.find_by_user_id(user_id))
            .await?;

        if let Some(memory) = &self.memory {
            if let Err(err) = memory.put_by_user(user_id, &appointments).await {
                self.put_failed(&key, err);
            }
        }

        Ok(new_response_slice(&appointments))
    }

    async fn find_by_salon_id(&self, ctx: &Context, salon_id: i64) -> Result<Vec<AppResponse>> {
        let key = format!("salon {salon_id}");

        if let Some(memory) = &self.memory {
            match memory.get_by_salon(salon_id).await {
                Ok(appointments) => {
                    tracing::trace!(
                        salon_id,
                        count = appointments.len(),
                        "Cache hit for salon appointments"
                    );
                    return Ok(new_response_slice(&appointments));
                }
                Err(err) => self.memory_failed(&key, err),
            }
        }

        let appointments = self
            .durable(ctx, self.repository.find_by_salon_id(salon_id))
            .await?;

        if let Some(memory) = &self.memory {
            if let Err(err) = memory.put_by_salon(salon_id, &appointments).await {
                self.put_failed(&key, err);
            }
        }

        Ok(new_response_slice(&appointments))
    }

    async fn find_available(&self, ctx: &Context) -> Result<Vec<AppResponse>> {
        let appointments = self.durable(ctx, self.repository.find_available()).await?;
        Ok(new_response_slice(&appointments))
    }

    async fn assign_appointment(
        &self,
        ctx: &Context,
        id: &str,
        user_id: i64,
    ) -> Result<AppResponse> {
        let current: Appointment = self.durable(ctx, self.repository.find_by_id(id)).await?;
        if !current.is_available() {
            return Err(self.record(AppointmentError::Unavailable(format!(
                "appointment {id} is already booked"
            ))));
        }

        let booked = self
            .durable(ctx, self.repository.assign(id, user_id))
            .await?;

        tracing::debug!(appointment_id = %id, user_id, "Appointment assigned");
        Ok(new_response(booked))
    }

    async fn cancel_appointment(
        &self,
        ctx: &Context,
        id: &str,
        user_id: i64,
    ) -> Result<AppResponse> {
        let released = self
            .durable(ctx, self.repository.cancel(id, user_id))
            .await?;

        tracing::debug!(appointment_id = %id, user_id, "Appointment cancelled");
        Ok(new_response(released))
    }

    async fn delete_appointment(&self, ctx: &Context, id: &str) -> Result<()> {
        self.durable(ctx, self.repository.delete(id)).await?;

        tracing::debug!(appointment_id = %id, "Appointment deleted");
        Ok(())
    }
}
