//! Per-call context handed to every endpoint.
//!
//! Carries a request id for log correlation plus an optional deadline and
//! cancellation signal. Only durable-store calls honor the deadline and the
//! signal; cache lookups run to completion.

use std::future::{pending, Future};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;
use uuid::Uuid;

use crate::error::AppointmentError;

#[derive(Debug, Clone)]
pub struct Context {
    request_id: Uuid,
    deadline: Option<Instant>,
    cancel: Option<watch::Receiver<bool>>,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// A context with a fresh request id, no deadline and no cancellation.
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            deadline: None,
            cancel: None,
        }
    }

    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }

    /// Sets the deadline to `timeout` from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Ties the context to a cancellation flag; `true` means cancelled.
    pub fn with_cancellation(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Runs `fut` unless the context is cancelled or its deadline passes first.
    ///
    /// Both abort paths surface as `Database` errors, since only durable
    /// calls are bounded by the context.
    pub async fn run<F, T>(&self, fut: F) -> Result<T, AppointmentError>
    where
        F: Future<Output = Result<T, AppointmentError>>,
    {
        let cancelled = async {
            match self.cancel.clone() {
                Some(mut rx) => loop {
                    if *rx.borrow_and_update() {
                        return;
                    }
                    if rx.changed().await.is_err() {
                        // Sender gone; the flag can no longer flip.
                        pending::<()>().await;
                    }
                },
                None => pending::<()>().await,
            }
        };

        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = cancelled => Err(AppointmentError::Database("request cancelled".to_string())),
            _ = expired => Err(AppointmentError::Database("deadline exceeded".to_string())),
            result = fut => result,
        }
    }
}
