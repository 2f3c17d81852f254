use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use appointments_core::error::{AppointmentError, ErrorBody, ErrorResponses};

/// An `AppointmentError` already mapped through the error table.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    pub fn new(errors: &ErrorResponses, err: &AppointmentError) -> Self {
        let mapped = errors.lookup(err);
        let status =
            StatusCode::from_u16(mapped.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        tracing::warn!(status = %status, error = %err, "API error");
        Self {
            status,
            body: ErrorBody {
                error: mapped.message.clone(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
