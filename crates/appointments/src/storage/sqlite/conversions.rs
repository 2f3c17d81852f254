//! SQLite row conversion functions.

use appointments_core::appointment::Appointment;
use chrono::{DateTime, Utc};
use rusqlite::Row;

/// Convert a SQLite row to an Appointment.
///
/// Expected columns: id, user_id, salon_id, appointment_date
pub fn row_to_appointment(row: &Row) -> rusqlite::Result<Appointment> {
    let id: String = row.get(0)?;
    let user_id: Option<i64> = row.get(1)?;
    let salon_id: i64 = row.get(2)?;
    let appointment_date: String = row.get(3)?;

    Ok(Appointment {
        id,
        user_id,
        salon_id,
        appointment_date: parse_datetime(&appointment_date)?,
    })
}

fn parse_datetime(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Format a DateTime for SQLite storage (RFC 3339, always `+00:00`).
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_datetime_roundtrip() {
        let dt = Utc.with_ymd_and_hms(2022, 6, 23, 21, 12, 2).unwrap();
        let formatted = format_datetime(&dt);

        assert_eq!(formatted, "2022-06-23T21:12:02+00:00");
        assert_eq!(parse_datetime(&formatted).unwrap(), dt);
    }

    #[test]
    fn test_parse_datetime_rejects_garbage() {
        assert!(parse_datetime("yesterday").is_err());
    }
}
