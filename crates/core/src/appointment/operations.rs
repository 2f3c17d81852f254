use super::requests::{AppResponse, UpsertAppointment};
use super::types::Appointment;

/// Converts an upsert payload into an entity.
///
/// The id is always dropped: ids are assigned by the durable store on create
/// and taken from the routing path on update.
pub fn new_appointment(dto: UpsertAppointment) -> Appointment {
    Appointment {
        id: String::new(),
        user_id: dto.user_id,
        salon_id: dto.salon_id,
        appointment_date: dto.appointment_date,
    }
}

/// Projects an entity into its response shape.
pub fn new_response(appointment: Appointment) -> AppResponse {
    AppResponse {
        id: appointment.id,
        user_id: appointment.user_id,
        salon_id: appointment.salon_id,
        appointment_date: appointment.appointment_date,
    }
}

/// Projects a sequence of entities, preserving order.
pub fn new_response_slice(appointments: &[Appointment]) -> Vec<AppResponse> {
    appointments.iter().cloned().map(new_response).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn fixed_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 6, 23, 21, 12, 2).unwrap()
    }

    #[test]
    fn test_payload_to_response_preserves_fields() {
        let dto = UpsertAppointment::new(1, fixed_date())
            .with_id("ignored")
            .with_user(7);

        let response = new_response(new_appointment(dto));

        assert_eq!(response.id, "");
        assert_eq!(response.user_id, Some(7));
        assert_eq!(response.salon_id, 1);
        assert_eq!(response.appointment_date, fixed_date());
    }

    #[test]
    fn test_response_slice_keeps_order() {
        let appointments = vec![
            Appointment::new(1, fixed_date()).with_id("a"),
            Appointment::new(2, fixed_date()).with_id("b").with_user(3),
        ];

        let responses = new_response_slice(&appointments);

        let ids: Vec<_> = responses.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(responses[1].user_id, Some(3));
    }

    #[test]
    fn test_response_slice_empty() {
        assert!(new_response_slice(&[]).is_empty());
    }
}
