//! Request validation rules.
//!
//! The validator is a plain value built once at startup and handed to the
//! transports that decode requests.

use chrono::{DateTime, Utc};

use super::error::ValidationError;
use super::requests::{AssignOrCancel, UpsertAppointment};

/// Validates decoded requests before they reach an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestValidator {
    allow_past_dates: bool,
}

impl Default for RequestValidator {
    fn default() -> Self {
        Self {
            allow_past_dates: true,
        }
    }
}

impl RequestValidator {
    pub fn new(allow_past_dates: bool) -> Self {
        Self { allow_past_dates }
    }

    /// Checks an upsert payload against the current time.
    pub fn validate_upsert(&self, dto: &UpsertAppointment) -> Result<(), ValidationError> {
        self.validate_upsert_at(dto, Utc::now())
    }

    /// Checks an upsert payload against an explicit `now`.
    pub fn validate_upsert_at(
        &self,
        dto: &UpsertAppointment,
        now: DateTime<Utc>,
    ) -> Result<(), ValidationError> {
        if dto.salon_id == 0 {
            return Err(ValidationError::MissingSalon);
        }
        if dto.user_id.is_some_and(|id| id < 0) {
            return Err(ValidationError::NegativeUser);
        }
        if !self.allow_past_dates && dto.appointment_date < now {
            return Err(ValidationError::PastDate);
        }
        Ok(())
    }

    /// Checks an assign/cancel payload.
    pub fn validate_assign(&self, dto: &AssignOrCancel) -> Result<(), ValidationError> {
        if dto.id.trim().is_empty() {
            return Err(ValidationError::MissingId);
        }
        if dto.user_id <= 0 {
            return Err(ValidationError::InvalidUser);
        }
        Ok(())
    }
}
