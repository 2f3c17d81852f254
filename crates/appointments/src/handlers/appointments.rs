//! Appointment handlers.
//!
//! Handlers only decode the request, validate it and dispatch through the
//! shared `EndpointSet`. Failures are mapped through the state's error table.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use appointments_core::appointment::{
    AssignOrCancel, DeleteAppointment, FindById, FindBySalon, FindByUser, UpsertAppointment,
};
use appointments_core::error::AppointmentError;

use crate::context::RequestContext;
use crate::endpoints::{EndpointRequest, EndpointResponse, UseCase};
use crate::handlers::ApiError;
use crate::state::AppState;

type HandlerResult<T> = Result<T, ApiError>;

/// Query parameters for the assign route.
#[derive(Debug, Default, Deserialize)]
pub struct AssignQuery {
    /// Cancel the booking instead of making it.
    #[serde(default)]
    pub cancel: bool,
}

fn path<T>(state: &AppState, result: Result<Path<T>, PathRejection>) -> HandlerResult<T> {
    result
        .map(|Path(value)| value)
        .map_err(|e| ApiError::new(&state.errors, &AppointmentError::InvalidPath(e.body_text())))
}

fn body(
    state: &AppState,
    result: Result<Json<UpsertAppointment>, JsonRejection>,
) -> HandlerResult<UpsertAppointment> {
    let Json(dto) = result
        .map_err(|e| ApiError::new(&state.errors, &AppointmentError::InvalidBody(e.body_text())))?;
    state
        .validator
        .validate_upsert(&dto)
        .map_err(|e| ApiError::new(&state.errors, &AppointmentError::from(e)))?;
    Ok(dto)
}

async fn dispatch(
    state: &AppState,
    ctx: RequestContext,
    use_case: UseCase,
    request: EndpointRequest,
) -> HandlerResult<EndpointResponse> {
    let request_id = ctx.request_id;
    state
        .endpoints
        .call(use_case, ctx.context, request)
        .await
        .map_err(|err| {
            tracing::debug!(%request_id, %use_case, "Endpoint failed");
            ApiError::new(&state.errors, &err)
        })
}

/// Create an appointment (POST /).
pub async fn create_appointment(
    State(state): State<AppState>,
    ctx: RequestContext,
    payload: Result<Json<UpsertAppointment>, JsonRejection>,
) -> HandlerResult<impl IntoResponse> {
    let dto = body(&state, payload)?;
    let response = dispatch(
        &state,
        ctx,
        UseCase::CreateAppointment,
        EndpointRequest::Upsert(dto),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Replace an appointment (PUT /{id}). The id in the path wins over the body.
pub async fn update_appointment(
    State(state): State<AppState>,
    ctx: RequestContext,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<UpsertAppointment>, JsonRejection>,
) -> HandlerResult<Json<EndpointResponse>> {
    let id = path(&state, id)?;
    let dto = body(&state, payload)?.with_id(id);
    let response = dispatch(
        &state,
        ctx,
        UseCase::UpdateAppointment,
        EndpointRequest::Upsert(dto),
    )
    .await?;
    Ok(Json(response))
}

/// Get one appointment (GET /{id}).
pub async fn find_appointment_by_id(
    State(state): State<AppState>,
    ctx: RequestContext,
    id: Result<Path<String>, PathRejection>,
) -> HandlerResult<Json<EndpointResponse>> {
    let id = path(&state, id)?;
    let response = dispatch(
        &state,
        ctx,
        UseCase::FindAppointmentById,
        EndpointRequest::FindById(FindById { id }),
    )
    .await?;
    Ok(Json(response))
}

/// List every appointment (GET /).
pub async fn find_all_appointments(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> HandlerResult<Json<EndpointResponse>> {
    let response = dispatch(
        &state,
        ctx,
        UseCase::FindAllAppointments,
        EndpointRequest::FindAll,
    )
    .await?;
    Ok(Json(response))
}

/// List a user's appointments (GET /user/{id}).
pub async fn find_appointment_by_user(
    State(state): State<AppState>,
    ctx: RequestContext,
    user_id: Result<Path<i64>, PathRejection>,
) -> HandlerResult<Json<EndpointResponse>> {
    let user_id = path(&state, user_id)?;
    let response = dispatch(
        &state,
        ctx,
        UseCase::FindAppointmentByUser,
        EndpointRequest::FindByUser(FindByUser { user_id }),
    )
    .await?;
    Ok(Json(response))
}

/// List a salon's appointments (GET /salon/{id}).
pub async fn find_appointment_by_salon(
    State(state): State<AppState>,
    ctx: RequestContext,
    salon_id: Result<Path<i64>, PathRejection>,
) -> HandlerResult<Json<EndpointResponse>> {
    let salon_id = path(&state, salon_id)?;
    let response = dispatch(
        &state,
        ctx,
        UseCase::FindAppointmentBySalon,
        EndpointRequest::FindBySalon(FindBySalon { salon_id }),
    )
    .await?;
    Ok(Json(response))
}

/// List open slots (GET /available).
pub async fn available_appointments(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> HandlerResult<Json<EndpointResponse>> {
    let response = dispatch(
        &state,
        ctx,
        UseCase::AvailableAppointments,
        EndpointRequest::Available,
    )
    .await?;
    Ok(Json(response))
}

/// Book or cancel a slot (PUT /{id}/{user}, `?cancel=true` to cancel).
pub async fn assign_appointment(
    State(state): State<AppState>,
    ctx: RequestContext,
    ids: Result<Path<(String, i64)>, PathRejection>,
    query: Result<Query<AssignQuery>, QueryRejection>,
) -> HandlerResult<Json<EndpointResponse>> {
    let (id, user_id) = path(&state, ids)?;
    let Query(query) = query.map_err(|e| {
        ApiError::new(&state.errors, &AppointmentError::InvalidPath(e.body_text()))
    })?;

    // Both fields come from the path here, not from a body.
    let dto = AssignOrCancel::new(id, user_id);
    state.validator.validate_assign(&dto).map_err(|e| {
        ApiError::new(&state.errors, &AppointmentError::InvalidPath(e.to_string()))
    })?;

    let use_case = if query.cancel {
        UseCase::CancelAppointment
    } else {
        UseCase::AssignAppointment
    };
    let response = dispatch(&state, ctx, use_case, EndpointRequest::AssignOrCancel(dto)).await?;
    Ok(Json(response))
}

/// Delete an appointment (DELETE /{id}).
pub async fn delete_appointment(
    State(state): State<AppState>,
    ctx: RequestContext,
    id: Result<Path<String>, PathRejection>,
) -> HandlerResult<StatusCode> {
    let id = path(&state, id)?;
    dispatch(
        &state,
        ctx,
        UseCase::DeleteAppointment,
        EndpointRequest::Delete(DeleteAppointment { id }),
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
