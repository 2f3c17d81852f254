//! SQLite repository implementation.

use async_trait::async_trait;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use appointments_core::appointment::Appointment;
use appointments_core::storage::{AppointmentExecer, AppointmentQuerier, RepositoryError, Result};

use super::conversions::{format_datetime, row_to_appointment};
use super::error::map_tokio_rusqlite_error;
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Reads one appointment by id on an open connection.
fn select_by_id(conn: &rusqlite::Connection, id: &str) -> rusqlite::Result<Appointment> {
    let mut stmt = conn.prepare(schema::SELECT_BY_ID)?;
    stmt.query_row([id], row_to_appointment)
}

/// Result of a cancel attempt, resolved inside a single connection call.
enum CancelOutcome {
    Cancelled(Appointment),
    NotHeld,
    Missing,
}

/// SQLite-based appointment repository.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    /// Runs a multi-row SELECT with an optional single integer parameter.
    async fn select_many(&self, sql: &'static str, param: Option<i64>) -> Result<Vec<Appointment>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(sql).map_err(wrap_err)?;
                let rows = match param {
                    Some(value) => stmt.query_map(rusqlite::params![value], row_to_appointment),
                    None => stmt.query_map(rusqlite::params![], row_to_appointment),
                }
                .map_err(wrap_err)?;

                let mut appointments = Vec::new();
                for row_result in rows {
                    appointments.push(row_result.map_err(wrap_err)?);
                }
                Ok(appointments)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, ""))
    }

    /// Runs a single-row UPDATE and reads the row back.
    ///
    /// Zero affected rows maps to `NotFound`.
    async fn update_one(
        &self,
        id: &str,
        sql: &'static str,
        params: Vec<rusqlite::types::Value>,
    ) -> Result<Appointment> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(sql, rusqlite::params_from_iter(params))
                    .map_err(wrap_err)?;
                if rows == 0 {
                    return Err(wrap_err(rusqlite::Error::QueryReturnedNoRows));
                }
                select_by_id(conn, &id_str).map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, id))
    }
}

#[async_trait]
impl AppointmentQuerier for SqliteRepository {
    async fn find_all(&self) -> Result<Vec<Appointment>> {
        self.select_many(schema::SELECT_ALL, None).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Appointment> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| select_by_id(conn, &id_str).map_err(wrap_err))
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, id))
    }

    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<Appointment>> {
        self.select_many(schema::SELECT_BY_USER, Some(user_id)).await
    }

    async fn find_by_salon_id(&self, salon_id: i64) -> Result<Vec<Appointment>> {
        self.select_many(schema::SELECT_BY_SALON, Some(salon_id)).await
    }

    async fn find_available(&self) -> Result<Vec<Appointment>> {
        self.select_many(schema::SELECT_AVAILABLE, None).await
    }
}

#[async_trait]
impl AppointmentExecer for SqliteRepository {
    async fn create(&self, appointment: &Appointment) -> Result<Appointment> {
        let created = appointment.clone().with_id(Uuid::new_v4().to_string());
        let id = created.id.clone();
        let user_id = created.user_id;
        let salon_id = created.salon_id;
        let appointment_date = format_datetime(&created.appointment_date);

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT,
                    rusqlite::params![id, user_id, salon_id, appointment_date],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, &created.id))?;

        Ok(created)
    }

    async fn update(&self, id: &str, appointment: &Appointment) -> Result<Appointment> {
        use rusqlite::types::Value;

        let params = vec![
            Value::Text(id.to_string()),
            appointment.user_id.map_or(Value::Null, Value::Integer),
            Value::Integer(appointment.salon_id),
            Value::Text(format_datetime(&appointment.appointment_date)),
        ];
        self.update_one(id, schema::UPDATE, params).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE, [&id_str])
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, id))
    }

    async fn assign(&self, id: &str, user_id: i64) -> Result<Appointment> {
        use rusqlite::types::Value;

        let params = vec![Value::Text(id.to_string()), Value::Integer(user_id)];
        self.update_one(id, schema::ASSIGN, params).await
    }

    async fn cancel(&self, id: &str, user_id: i64) -> Result<Appointment> {
        let id_str = id.to_string();

        let outcome = self
            .conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::CANCEL, rusqlite::params![id_str, user_id])
                    .map_err(wrap_err)?;
                if rows > 0 {
                    let appointment = select_by_id(conn, &id_str).map_err(wrap_err)?;
                    return Ok(CancelOutcome::Cancelled(appointment));
                }

                let exists: bool = conn
                    .query_row(schema::EXISTS_BY_ID, [&id_str], |row| row.get(0))
                    .map_err(wrap_err)?;
                Ok(if exists {
                    CancelOutcome::NotHeld
                } else {
                    CancelOutcome::Missing
                })
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, id))?;

        match outcome {
            CancelOutcome::Cancelled(appointment) => Ok(appointment),
            CancelOutcome::NotHeld => Err(RepositoryError::OwnershipMismatch {
                id: id.to_string(),
                user_id,
            }),
            CancelOutcome::Missing => Err(RepositoryError::appointment_not_found(id)),
        }
    }
}
