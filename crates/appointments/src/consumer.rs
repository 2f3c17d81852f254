//! Work-queue adapter.
//!
//! One tokio task per queue pulls deliveries from the broker, decodes and
//! validates the JSON body, dispatches through the shared `EndpointSet` and
//! publishes either the response or `{"error": ...}` as the reply. Every
//! delivery is acknowledged, including failed ones.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use appointments_core::appointment::{AssignOrCancel, RequestValidator, UpsertAppointment};
use appointments_core::broker::{Broker, Delivery};
use appointments_core::context::Context;
use appointments_core::error::{AppointmentError, Result};

use crate::endpoints::{EndpointRequest, UseCase};
use crate::state::AppState;

/// Back-off after a broker failure before polling again.
const RETRY_DELAY: Duration = Duration::from_secs(1);

type Decoder = fn(&RequestValidator, &[u8]) -> Result<EndpointRequest>;

/// A queue and the use case its messages are routed to.
#[derive(Clone, Copy)]
pub struct Route {
    pub queue: &'static str,
    pub use_case: UseCase,
    decode: Decoder,
}

/// Queues consumed by default. `make` is an alias of `assign`.
pub const ROUTES: [Route; 3] = [
    Route {
        queue: "create",
        use_case: UseCase::CreateAppointment,
        decode: decode_create,
    },
    Route {
        queue: "assign",
        use_case: UseCase::AssignAppointment,
        decode: decode_assign,
    },
    Route {
        queue: "make",
        use_case: UseCase::AssignAppointment,
        decode: decode_assign,
    },
];

fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| AppointmentError::InvalidBody(e.to_string()))
}

fn decode_create(validator: &RequestValidator, body: &[u8]) -> Result<EndpointRequest> {
    let dto: UpsertAppointment = decode_json(body)?;
    validator.validate_upsert(&dto)?;
    Ok(EndpointRequest::Upsert(dto))
}

fn decode_assign(validator: &RequestValidator, body: &[u8]) -> Result<EndpointRequest> {
    let dto: AssignOrCancel = decode_json(body)?;
    validator.validate_assign(&dto)?;
    Ok(EndpointRequest::AssignOrCancel(dto))
}

/// Consumes the work queues until shutdown is signalled.
pub struct QueueConsumer {
    broker: Arc<dyn Broker>,
    state: AppState,
}

impl QueueConsumer {
    pub fn new(broker: Arc<dyn Broker>, state: AppState) -> Self {
        Self { broker, state }
    }

    /// Spawns one worker per route. Workers stop once shutdown is signalled.
    pub fn spawn(self) -> Vec<JoinHandle<()>> {
        let consumer = Arc::new(self);
        ROUTES
            .into_iter()
            .map(|route| {
                let consumer = Arc::clone(&consumer);
                tokio::spawn(async move { consumer.run(route).await })
            })
            .collect()
    }

    async fn run(&self, route: Route) {
        let shutdown = self.state.subscribe_shutdown();
        tracing::info!(queue = route.queue, use_case = %route.use_case, "Queue worker started");

        while !*shutdown.borrow() {
            match self.broker.next(route.queue).await {
                Ok(Some(delivery)) => self.handle(&route, &delivery, &shutdown).await,
                Ok(None) => {}
                Err(e) => {
                    tracing::error!(queue = route.queue, error = %e, "Failed to poll queue");
                    tokio::time::sleep(RETRY_DELAY).await;
                }
            }
        }

        tracing::info!(queue = route.queue, "Queue worker stopped");
    }

    /// Handles one delivery and always acknowledges it.
    async fn handle(&self, route: &Route, delivery: &Delivery, shutdown: &watch::Receiver<bool>) {
        let reply = match self.process(route, delivery, shutdown).await {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!(queue = route.queue, tag = delivery.tag, error = %err, "Delivery failed");
                serde_json::to_vec(&self.state.errors.body(&err))
            }
        };

        match reply {
            Ok(body) => {
                if let Err(e) = self.broker.reply(delivery, &body).await {
                    tracing::error!(queue = route.queue, tag = delivery.tag, error = %e, "Failed to publish reply");
                }
            }
            Err(e) => {
                tracing::error!(queue = route.queue, tag = delivery.tag, error = %e, "Failed to encode reply");
            }
        }

        if let Err(e) = self.broker.ack(delivery).await {
            tracing::error!(queue = route.queue, tag = delivery.tag, error = %e, "Failed to ack delivery");
        }
    }

    async fn process(
        &self,
        route: &Route,
        delivery: &Delivery,
        shutdown: &watch::Receiver<bool>,
    ) -> Result<serde_json::Result<Vec<u8>>> {
        let request = (route.decode)(&self.state.validator, &delivery.body)?;
        let ctx = Context::new()
            .with_timeout(self.state.request_timeout)
            .with_cancellation(shutdown.clone());

        tracing::debug!(queue = route.queue, tag = delivery.tag, request_id = %ctx.request_id(), "Processing delivery");
        let response = self
            .state
            .endpoints
            .call(route.use_case, ctx, request)
            .await?;
        Ok(serde_json::to_vec(&response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    use appointments_core::appointment::AppResponse;

    use crate::broker::MemoryBroker;

    struct Harness {
        broker: MemoryBroker,
        state: AppState,
        workers: Vec<JoinHandle<()>>,
    }

    impl Harness {
        fn start() -> Self {
            let broker = MemoryBroker::new();
            let state = AppState::default();
            let workers = QueueConsumer::new(Arc::new(broker.clone()), state.clone()).spawn();
            Self {
                broker,
                state,
                workers,
            }
        }

        async fn request(&self, queue: &str, body: Value) -> Value {
            self.broker
                .publish(queue, body.to_string().as_bytes())
                .await
                .unwrap();
            let reply = self
                .broker
                .next_reply(queue, Duration::from_secs(5))
                .await
                .expect("reply expected");
            serde_json::from_slice(&reply).unwrap()
        }

        async fn stop(self) {
            self.state.signal_shutdown();
            for worker in self.workers {
                worker.await.unwrap();
            }
        }
    }

    fn slot() -> Value {
        json!({ "salon_id": 1, "appointment_date": "2022-06-23T21:12:02Z" })
    }

    #[tokio::test]
    async fn test_create_replies_with_appointment() {
        let harness = Harness::start();

        let reply = harness.request("create", slot()).await;
        let created: AppResponse = serde_json::from_value(reply).unwrap();

        assert!(!created.id.is_empty());
        assert_eq!(created.salon_id, 1);
        assert_eq!(created.user_id, None);
        assert_eq!(harness.broker.acked(), 1);

        harness.stop().await;
    }

    #[tokio::test]
    async fn test_assign_and_make_alias() {
        let harness = Harness::start();
        let first = harness.request("create", slot()).await;
        let second = harness.request("create", slot()).await;

        let booked = harness
            .request("assign", json!({ "id": first["id"], "user_id": 7 }))
            .await;
        assert_eq!(booked["user_id"], 7);

        let made = harness
            .request("make", json!({ "id": second["id"], "user_id": 9 }))
            .await;
        assert_eq!(made["user_id"], 9);

        let taken = harness
            .request("make", json!({ "id": first["id"], "user_id": 9 }))
            .await;
        assert_eq!(taken, json!({ "error": "Appointment is not available" }));

        harness.stop().await;
    }

    #[tokio::test]
    async fn test_malformed_body_replies_error_and_acks() {
        let harness = Harness::start();

        harness.broker.publish("create", b"not json").await.unwrap();
        let reply = harness
            .broker
            .next_reply("create", Duration::from_secs(5))
            .await
            .unwrap();

        let body: Value = serde_json::from_slice(&reply).unwrap();
        assert_eq!(body, json!({ "error": "Invalid body" }));
        assert_eq!(harness.broker.acked(), 1);

        harness.stop().await;
    }

    #[tokio::test]
    async fn test_validation_failure_replies_error() {
        let harness = Harness::start();

        let reply = harness
            .request("assign", json!({ "id": "abc", "user_id": -1 }))
            .await;

        assert_eq!(reply, json!({ "error": "Invalid body" }));
        harness.stop().await;
    }

    #[tokio::test]
    async fn test_unknown_appointment_replies_not_found() {
        let harness = Harness::start();

        let reply = harness
            .request("assign", json!({ "id": "missing", "user_id": 3 }))
            .await;

        assert_eq!(reply, json!({ "error": "Appointment not found" }));
        harness.stop().await;
    }

    #[tokio::test]
    async fn test_workers_stop_on_shutdown() {
        let harness = Harness::start();
        assert_eq!(harness.workers.len(), ROUTES.len());

        tokio::time::timeout(Duration::from_secs(5), harness.stop())
            .await
            .expect("workers should stop");
    }

    #[test]
    fn test_decoders() {
        let validator = RequestValidator::default();

        let request = decode_create(&validator, slot().to_string().as_bytes()).unwrap();
        assert!(matches!(request, EndpointRequest::Upsert(_)));

        let err = decode_create(&validator, br#"{"appointment_date":"2022-06-23T21:12:02Z"}"#)
            .unwrap_err();
        assert!(matches!(err, AppointmentError::InvalidBody(_)));

        let request = decode_assign(&validator, br#"{"id":"a","user_id":1}"#).unwrap();
        assert_eq!(
            request,
            EndpointRequest::AssignOrCancel(AssignOrCancel::new("a", 1))
        );
    }
}
