use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A bookable slot at a salon.
///
/// `user_id` is the assignment: `None` means the slot is available, `Some`
/// means it is booked by that user. `id` is assigned by the durable store on
/// create and stays empty until then.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(default)]
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

impl Appointment {
    /// Creates a new, unassigned, not yet persisted appointment.
    pub fn new(salon_id: i64, appointment_date: DateTime<Utc>) -> Self {
        Self {
            id: String::new(),
            user_id: None,
            salon_id,
            appointment_date,
        }
    }

    /// Sets a specific ID for this appointment.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Assigns the appointment to a user.
    pub fn with_user(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Returns true if no user holds this slot.
    pub fn is_available(&self) -> bool {
        self.user_id.is_none()
    }

    /// Returns true if the given user holds this slot.
    pub fn is_held_by(&self, user_id: i64) -> bool {
        self.user_id == Some(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 6, 23, 21, 12, 2).unwrap()
    }

    #[test]
    fn test_new_appointment_is_available() {
        let appointment = Appointment::new(1, fixed_date());

        assert!(appointment.id.is_empty());
        assert!(appointment.is_available());
        assert!(!appointment.is_held_by(7));
    }

    #[test]
    fn test_with_user_books_the_slot() {
        let appointment = Appointment::new(1, fixed_date()).with_user(7);

        assert!(!appointment.is_available());
        assert!(appointment.is_held_by(7));
        assert!(!appointment.is_held_by(8));
    }

    #[test]
    fn test_json_field_names() {
        let appointment = Appointment::new(3, fixed_date()).with_id("abc");
        let json = serde_json::to_value(&appointment).unwrap();

        assert_eq!(json["id"], "abc");
        assert_eq!(json["user_id"], 0);
        assert_eq!(json["salon_id"], 3);
        assert_eq!(json["appointment_date"], "2022-06-23T21:12:02Z");
    }
}
