//! SQLite schema definitions and SQL query constants.

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS appointments (
    id TEXT PRIMARY KEY,
    user_id INTEGER,
    salon_id INTEGER NOT NULL,
    appointment_date TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_appointments_user_id ON appointments(user_id);
CREATE INDEX IF NOT EXISTS idx_appointments_salon_id ON appointments(salon_id);
"#;

pub const SELECT_ALL: &str = r#"
SELECT id, user_id, salon_id, appointment_date
FROM appointments
ORDER BY appointment_date, id
"#;

pub const SELECT_BY_ID: &str = r#"
SELECT id, user_id, salon_id, appointment_date
FROM appointments
WHERE id = ?1
"#;

pub const SELECT_BY_USER: &str = r#"
SELECT id, user_id, salon_id, appointment_date
FROM appointments
WHERE user_id = ?1
ORDER BY appointment_date, id
"#;

pub const SELECT_BY_SALON: &str = r#"
SELECT id, user_id, salon_id, appointment_date
FROM appointments
WHERE salon_id = ?1
ORDER BY appointment_date, id
"#;

pub const SELECT_AVAILABLE: &str = r#"
SELECT id, user_id, salon_id, appointment_date
FROM appointments
WHERE user_id IS NULL
ORDER BY appointment_date, id
"#;

pub const EXISTS_BY_ID: &str = "SELECT EXISTS(SELECT 1 FROM appointments WHERE id = ?1)";

pub const INSERT: &str = r#"
INSERT INTO appointments (id, user_id, salon_id, appointment_date)
VALUES (?1, ?2, ?3, ?4)
"#;

pub const UPDATE: &str = r#"
UPDATE appointments
SET user_id = ?2, salon_id = ?3, appointment_date = ?4
WHERE id = ?1
"#;

pub const DELETE: &str = "DELETE FROM appointments WHERE id = ?1";

pub const ASSIGN: &str = "UPDATE appointments SET user_id = ?2 WHERE id = ?1";

/// Clears the assignment only when the caller holds it.
pub const CANCEL: &str = "UPDATE appointments SET user_id = NULL WHERE id = ?1 AND user_id = ?2";
