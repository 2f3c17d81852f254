//! `tracing`-backed event log.

use std::fmt::Display;

use chrono::Utc;

use appointments_core::log::{EventLog, LogError};

/// Writes every event as an `error!` record stamped with the current UTC time.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventLog;

impl EventLog for TracingEventLog {
    fn log_with_time(&self, event: &dyn Display) -> Result<(), LogError> {
        tracing::error!(at = %Utc::now().to_rfc3339(), event = %event, "Appointment operation failed");
        Ok(())
    }
}
