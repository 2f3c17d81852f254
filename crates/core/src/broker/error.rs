use thiserror::Error;

/// Errors raised by a message broker.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BrokerError {
    #[error("Broker connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Broker operation failed: {0}")]
    OperationFailed(String),
    #[error("Queue closed: {0}")]
    Closed(String),
}

pub type Result<T> = std::result::Result<T, BrokerError>;
