use thiserror::Error;

/// Rule violations found while validating an inbound request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("salon_id is required")]
    MissingSalon,
    #[error("user_id cannot be negative")]
    NegativeUser,
    #[error("appointment_date cannot be in the past")]
    PastDate,
    #[error("id is required")]
    MissingId,
    #[error("user_id must be a positive integer")]
    InvalidUser,
}
