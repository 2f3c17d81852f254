//! Closed error taxonomy and the error-to-response table.
//!
//! Every layer converts its own error type into [`AppointmentError`]; the
//! transports then look the error up in an [`ErrorResponses`] table to pick
//! the user-facing message and status.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::appointment::ValidationError;
use crate::cache::CacheError;
use crate::storage::RepositoryError;

/// Every failure the appointment use cases can report.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AppointmentError {
    #[error("Appointment not found: {0}")]
    NotFound(String),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Memory database error: {0}")]
    MemoryDatabase(String),
    #[error("Unexpected request shape, expected {0}")]
    TypeAssertion(&'static str),
    #[error("Invalid path: {0}")]
    InvalidPath(String),
    #[error("Invalid body: {0}")]
    InvalidBody(String),
    #[error("Durable repository is required")]
    EmptyRepository,
    #[error("Appointment unavailable: {0}")]
    Unavailable(String),
}

/// Discriminant of [`AppointmentError`], used as the response table key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Database,
    MemoryDatabase,
    TypeAssertion,
    InvalidPath,
    InvalidBody,
    EmptyRepository,
    Unavailable,
}

impl AppointmentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppointmentError::NotFound(_) => ErrorKind::NotFound,
            AppointmentError::Database(_) => ErrorKind::Database,
            AppointmentError::MemoryDatabase(_) => ErrorKind::MemoryDatabase,
            AppointmentError::TypeAssertion(_) => ErrorKind::TypeAssertion,
            AppointmentError::InvalidPath(_) => ErrorKind::InvalidPath,
            AppointmentError::InvalidBody(_) => ErrorKind::InvalidBody,
            AppointmentError::EmptyRepository => ErrorKind::EmptyRepository,
            AppointmentError::Unavailable(_) => ErrorKind::Unavailable,
        }
    }
}

impl From<RepositoryError> for AppointmentError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { id, .. } => AppointmentError::NotFound(id),
            RepositoryError::OwnershipMismatch { .. } => {
                AppointmentError::Unavailable(err.to_string())
            }
            other => AppointmentError::Database(other.to_string()),
        }
    }
}

impl From<CacheError> for AppointmentError {
    fn from(err: CacheError) -> Self {
        AppointmentError::MemoryDatabase(err.to_string())
    }
}

impl From<ValidationError> for AppointmentError {
    fn from(err: ValidationError) -> Self {
        AppointmentError::InvalidBody(err.to_string())
    }
}

/// Result type for appointment use cases.
pub type Result<T> = std::result::Result<T, AppointmentError>;

/// User-facing message and status for one error kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub message: String,
    pub status: u16,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, status: u16) -> Self {
        Self {
            message: message.into(),
            status,
        }
    }
}

/// JSON error payload shared by HTTP responses and queue replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Immutable mapping from error kind to user-facing response.
///
/// Kinds without an entry fall back to a generic internal error.
#[derive(Debug, Clone)]
pub struct ErrorResponses {
    table: HashMap<ErrorKind, ErrorResponse>,
    fallback: ErrorResponse,
}

impl Default for ErrorResponses {
    fn default() -> Self {
        Self::empty()
            .with(ErrorKind::NotFound, "Appointment not found", 404)
            .with(ErrorKind::Database, "An error happened in database", 500)
            .with(ErrorKind::MemoryDatabase, "Memory Database error", 400)
            .with(ErrorKind::InvalidPath, "Cannot read path", 400)
            .with(ErrorKind::InvalidBody, "Invalid body", 400)
            .with(ErrorKind::Unavailable, "Appointment is not available", 409)
    }
}

impl ErrorResponses {
    /// A table with no entries; every error maps to the fallback.
    pub fn empty() -> Self {
        Self {
            table: HashMap::new(),
            fallback: ErrorResponse::new("Sorry, something went wrong", 500),
        }
    }

    /// Returns a copy of the table with `kind` mapped to `message`/`status`.
    pub fn with(mut self, kind: ErrorKind, message: impl Into<String>, status: u16) -> Self {
        self.table.insert(kind, ErrorResponse::new(message, status));
        self
    }

    pub fn lookup(&self, error: &AppointmentError) -> &ErrorResponse {
        self.table.get(&error.kind()).unwrap_or(&self.fallback)
    }

    pub fn body(&self, error: &AppointmentError) -> ErrorBody {
        ErrorBody {
            error: self.lookup(error).message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let table = ErrorResponses::default();
        let cases = [
            (
                AppointmentError::NotFound("x".into()),
                "Appointment not found",
                404,
            ),
            (
                AppointmentError::Database("x".into()),
                "An error happened in database",
                500,
            ),
            (
                AppointmentError::MemoryDatabase("x".into()),
                "Memory Database error",
                400,
            ),
            (AppointmentError::InvalidPath("x".into()), "Cannot read path", 400),
            (AppointmentError::InvalidBody("x".into()), "Invalid body", 400),
            (
                AppointmentError::Unavailable("x".into()),
                "Appointment is not available",
                409,
            ),
        ];

        for (error, message, status) in cases {
            let response = table.lookup(&error);
            assert_eq!(response.message, message, "{error:?}");
            assert_eq!(response.status, status, "{error:?}");
        }
    }

    #[test]
    fn test_unmapped_kinds_use_fallback() {
        let table = ErrorResponses::default();

        for error in [
            AppointmentError::TypeAssertion("FindById"),
            AppointmentError::EmptyRepository,
        ] {
            let response = table.lookup(&error);
            assert_eq!(response.message, "Sorry, something went wrong");
            assert_eq!(response.status, 500);
        }
    }

    #[test]
    fn test_custom_table_overrides_entry() {
        let table = ErrorResponses::default().with(ErrorKind::NotFound, "Nope", 410);
        let response = table.lookup(&AppointmentError::NotFound("x".into()));

        assert_eq!(response, &ErrorResponse::new("Nope", 410));
    }

    #[test]
    fn test_body_uses_mapped_message() {
        let table = ErrorResponses::default();
        let body = table.body(&AppointmentError::InvalidBody("salon_id is required".into()));

        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"error":"Invalid body"}"#
        );
    }

    #[test]
    fn test_repository_error_conversion() {
        let not_found: AppointmentError = RepositoryError::appointment_not_found("abc").into();
        assert_eq!(not_found, AppointmentError::NotFound("abc".into()));

        let ownership: AppointmentError = RepositoryError::OwnershipMismatch {
            id: "abc".into(),
            user_id: 8,
        }
        .into();
        assert_eq!(ownership.kind(), ErrorKind::Unavailable);

        let failed: AppointmentError = RepositoryError::QueryFailed("disk I/O".into()).into();
        assert_eq!(failed, AppointmentError::Database("Query failed: disk I/O".into()));
    }

    #[test]
    fn test_cache_and_validation_conversion() {
        let cache: AppointmentError = CacheError::Miss("user_7".into()).into();
        assert_eq!(cache.kind(), ErrorKind::MemoryDatabase);

        let invalid: AppointmentError = ValidationError::MissingSalon.into();
        assert_eq!(
            invalid,
            AppointmentError::InvalidBody("salon_id is required".into())
        );
    }
}
