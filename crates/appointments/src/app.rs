use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    routing::{get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        appointments::{
            assign_appointment, available_appointments, create_appointment, delete_appointment,
            find_all_appointments, find_appointment_by_id, find_appointment_by_salon,
            find_appointment_by_user, update_appointment,
        },
        health::livez,
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    // The durable-call deadline must fire before the HTTP timeout.
    let timeout = state.request_timeout + Duration::from_secs(1);

    Router::new()
        .route("/livez", get(livez))
        .route("/", get(find_all_appointments).post(create_appointment))
        .route("/available", get(available_appointments))
        .route("/user/{id}", get(find_appointment_by_user))
        .route("/salon/{id}", get(find_appointment_by_salon))
        .route(
            "/{id}",
            get(find_appointment_by_id)
                .put(update_appointment)
                .delete(delete_appointment),
        )
        .route("/{id}/{user}", put(assign_appointment))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .with_state(state)
}
