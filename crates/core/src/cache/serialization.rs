//! Pure functions for serializing appointments to and from cache bytes.
//!
//! Values are stored as JSON so they stay readable from `redis-cli`.

use thiserror::Error;

use crate::appointment::Appointment;

use super::CacheError;

/// Errors that can occur during cache serialization/deserialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    #[error("Failed to serialize: {0}")]
    SerializeFailed(String),
    #[error("Failed to deserialize: {0}")]
    DeserializeFailed(String),
}

impl From<SerializationError> for CacheError {
    fn from(err: SerializationError) -> Self {
        CacheError::Serialization(err.to_string())
    }
}

/// Result type for serialization operations.
pub type Result<T> = std::result::Result<T, SerializationError>;

pub fn serialize_appointment(appointment: &Appointment) -> Result<Vec<u8>> {
    serde_json::to_vec(appointment).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

pub fn deserialize_appointment(bytes: &[u8]) -> Result<Appointment> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}

pub fn serialize_appointments(appointments: &[Appointment]) -> Result<Vec<u8>> {
    serde_json::to_vec(appointments)
        .map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

pub fn deserialize_appointments(bytes: &[u8]) -> Result<Vec<Appointment>> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}
