//! Event log capability used to record failures with a timestamp.

use std::fmt::Display;

use thiserror::Error;

/// Errors raised by an event log sink.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LogError {
    #[error("Event log unavailable: {0}")]
    Unavailable(String),
}

/// Fire-and-forget failure log.
///
/// Implementations must not block. Callers ignore the returned error.
pub trait EventLog: Send + Sync {
    fn log_with_time(&self, event: &dyn Display) -> Result<(), LogError>;
}

/// Event log that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventLog;

impl EventLog for NoopEventLog {
    fn log_with_time(&self, _event: &dyn Display) -> Result<(), LogError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_accepts_everything() {
        assert!(NoopEventLog.log_with_time(&"anything").is_ok());
    }

    #[test]
    fn test_log_error_display() {
        let error = LogError::Unavailable("sink closed".to_string());
        assert_eq!(error.to_string(), "Event log unavailable: sink closed");
    }
}
