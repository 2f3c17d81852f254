use async_trait::async_trait;

use crate::appointment::Appointment;

use super::Result;

/// Read side of the durable appointment store.
#[async_trait]
pub trait AppointmentQuerier: Send + Sync {
    /// Returns every stored appointment.
    async fn find_all(&self) -> Result<Vec<Appointment>>;

    /// Returns the appointment with the given id, or `NotFound`.
    async fn find_by_id(&self, id: &str) -> Result<Appointment>;

    /// Returns the appointments booked by a user.
    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<Appointment>>;

    /// Returns the appointments offered by a salon.
    async fn find_by_salon_id(&self, salon_id: i64) -> Result<Vec<Appointment>>;

    /// Returns the appointments nobody has booked.
    async fn find_available(&self) -> Result<Vec<Appointment>>;
}

/// Write side of the durable appointment store.
#[async_trait]
pub trait AppointmentExecer: Send + Sync {
    /// Persists a new appointment and returns it with its store-assigned id.
    async fn create(&self, appointment: &Appointment) -> Result<Appointment>;

    /// Replaces the mutable fields of the appointment with the given id.
    async fn update(&self, id: &str, appointment: &Appointment) -> Result<Appointment>;

    /// Removes an appointment. Fails with `NotFound` if nothing was removed.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Sets the assignment of an appointment. Does not check availability.
    async fn assign(&self, id: &str, user_id: i64) -> Result<Appointment>;

    /// Clears the assignment if, and only if, `user_id` currently holds it.
    ///
    /// A holder mismatch fails with `OwnershipMismatch` and leaves the record
    /// untouched.
    async fn cancel(&self, id: &str, user_id: i64) -> Result<Appointment>;
}

/// Combined durable repository used by the service.
pub trait AppointmentRepository: AppointmentQuerier + AppointmentExecer {}

impl<T: AppointmentQuerier + AppointmentExecer> AppointmentRepository for T {}
