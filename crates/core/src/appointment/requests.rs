//! Request and response shapes shared by every transport.
//!
//! Field names match the JSON carried over HTTP and the work queues:
//! `id`, `user_id`, `salon_id`, `appointment_date`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Payload for creating or replacing an appointment.
///
/// `id` is ignored on create. On update it is taken from the routing path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertAppointment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(
        default,
        deserialize_with = "crate::serde::deserialize_user_id",
        serialize_with = "crate::serde::serialize_user_id"
    )]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub salon_id: i64,
    pub appointment_date: DateTime<Utc>,
}

impl UpsertAppointment {
    /// Create a payload for an open slot at a salon.
    pub fn new(salon_id: i64, appointment_date: DateTime<Utc>) -> Self {
        Self {
            id: None,
            user_id: None,
            salon_id,
            appointment_date,
        }
    }

    /// Set the target appointment id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the assigned user.
    pub fn with_user(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindById {
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindByUser {
    pub user_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindBySalon {
    pub salon_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteAppointment {
    pub id: String,
}

/// Payload for booking a slot (assign) or releasing it (cancel).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignOrCancel {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_id: i64,
}

impl AssignOrCancel {
    pub fn new(id: impl Into<String>, user_id: i64) -> Self {
        Self {
            id: id.into(),
            user_id,
        }
    }
}

/// Read projection returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppResponse {
    pub id: String,
    #[serde(
        default,
        deserialize_with = "crate::serde::deserialize_user_id",
        serialize_with = "crate::serde::serialize_user_id"
    )]
    pub user_id: Option<i64>,
    pub salon_id: i64,
    pub appointment_date: DateTime<Utc>,
}
