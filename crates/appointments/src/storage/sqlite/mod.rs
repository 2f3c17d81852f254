//! SQLite storage backend.
//!
//! Uses `rusqlite` for the synchronous driver and `tokio-rusqlite` to run it
//! on a dedicated thread. Every mutation is a single `UPDATE`/`DELETE`
//! statement, so conflicting writes on one appointment serialize in SQLite.

mod conversions;
mod error;
mod repository;
mod schema;

pub use repository::SqliteRepository;
