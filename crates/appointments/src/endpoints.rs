//! Transport-agnostic endpoints.
//!
//! One function per use case, each taking `(Context, EndpointRequest)` and
//! returning an [`EndpointResponse`]. An endpoint only checks that the request
//! variant matches its use case and forwards to the service. Both the HTTP
//! router and the queue consumer call through the same [`EndpointSet`].

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde::Serialize;

use appointments_core::appointment::{
    AppResponse, AssignOrCancel, DeleteAppointment, FindById, FindBySalon, FindByUser,
    UpsertAppointment,
};
use appointments_core::context::Context;
use appointments_core::error::{AppointmentError, Result};

use crate::service::AppointmentService;

/// Names of the use cases held in an [`EndpointSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UseCase {
    CreateAppointment,
    UpdateAppointment,
    FindAppointmentById,
    FindAllAppointments,
    FindAppointmentByUser,
    FindAppointmentBySalon,
    AvailableAppointments,
    AssignAppointment,
    CancelAppointment,
    DeleteAppointment,
}

impl UseCase {
    pub const ALL: [UseCase; 10] = [
        UseCase::CreateAppointment,
        UseCase::UpdateAppointment,
        UseCase::FindAppointmentById,
        UseCase::FindAllAppointments,
        UseCase::FindAppointmentByUser,
        UseCase::FindAppointmentBySalon,
        UseCase::AvailableAppointments,
        UseCase::AssignAppointment,
        UseCase::CancelAppointment,
        UseCase::DeleteAppointment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UseCase::CreateAppointment => "createAppointment",
            UseCase::UpdateAppointment => "updateAppointment",
            UseCase::FindAppointmentById => "findAppointmentByID",
            UseCase::FindAllAppointments => "findAllAppointments",
            UseCase::FindAppointmentByUser => "findAppointmentByUser",
            UseCase::FindAppointmentBySalon => "findAppointmentBySalon",
            UseCase::AvailableAppointments => "availableAppointments",
            UseCase::AssignAppointment => "assignAppointment",
            UseCase::CancelAppointment => "cancelAppointment",
            UseCase::DeleteAppointment => "deleteAppointment",
        }
    }
}

impl fmt::Display for UseCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded request handed to an endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointRequest {
    Upsert(UpsertAppointment),
    FindById(FindById),
    FindAll,
    FindByUser(FindByUser),
    FindBySalon(FindBySalon),
    Available,
    AssignOrCancel(AssignOrCancel),
    Delete(DeleteAppointment),
}

/// Value returned by an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EndpointResponse {
    Appointment(AppResponse),
    Appointments(Vec<AppResponse>),
    Empty,
}

pub type Endpoint = Arc<
    dyn Fn(Context, EndpointRequest) -> BoxFuture<'static, Result<EndpointResponse>> + Send + Sync,
>;

fn endpoint<F, Fut>(service: Arc<dyn AppointmentService>, f: F) -> Endpoint
where
    F: Fn(Arc<dyn AppointmentService>, Context, EndpointRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<EndpointResponse>> + Send + 'static,
{
    Arc::new(move |ctx, request| Box::pin(f(service.clone(), ctx, request)))
}

pub fn create_appointment(service: Arc<dyn AppointmentService>) -> Endpoint {
    endpoint(service, |service, ctx, request| async move {
        let EndpointRequest::Upsert(dto) = request else {
            return Err(AppointmentError::TypeAssertion("UpsertAppointment"));
        };
        let response = service.create_appointment(&ctx, dto).await?;
        Ok(EndpointResponse::Appointment(response))
    })
}

pub fn update_appointment(service: Arc<dyn AppointmentService>) -> Endpoint {
    endpoint(service, |service, ctx, request| async move {
        let EndpointRequest::Upsert(dto) = request else {
            return Err(AppointmentError::TypeAssertion("UpsertAppointment"));
        };
        let response = service.update_appointment(&ctx, dto).await?;
        Ok(EndpointResponse::Appointment(response))
    })
}

pub fn find_appointment_by_id(service: Arc<dyn AppointmentService>) -> Endpoint {
    endpoint(service, |service, ctx, request| async move {
        let EndpointRequest::FindById(FindById { id }) = request else {
            return Err(AppointmentError::TypeAssertion("FindById"));
        };
        let response = service.find_by_id(&ctx, &id).await?;
        Ok(EndpointResponse::Appointment(response))
    })
}

pub fn find_all_appointments(service: Arc<dyn AppointmentService>) -> Endpoint {
    endpoint(service, |service, ctx, request| async move {
        let EndpointRequest::FindAll = request else {
            return Err(AppointmentError::TypeAssertion("FindAll"));
        };
        let responses = service.find_all(&ctx).await?;
        Ok(EndpointResponse::Appointments(responses))
    })
}

pub fn find_appointment_by_user(service: Arc<dyn AppointmentService>) -> Endpoint {
    endpoint(service, |service, ctx, request| async move {
        let EndpointRequest::FindByUser(FindByUser { user_id }) = request else {
            return Err(AppointmentError::TypeAssertion("FindByUser"));
        };
        let responses = service.find_by_user_id(&ctx, user_id).await?;
        Ok(EndpointResponse::Appointments(responses))
    })
}

pub fn find_appointment_by_salon(service: Arc<dyn AppointmentService>) -> Endpoint {
    endpoint(service, |service, ctx, request| async move {
        let EndpointRequest::FindBySalon(FindBySalon { salon_id }) = request else {
            return Err(AppointmentError::TypeAssertion("FindBySalon"));
        };
        let responses = service.find_by_salon_id(&ctx, salon_id).await?;
        Ok(EndpointResponse::Appointments(responses))
    })
}

pub fn available_appointments(service: Arc<dyn AppointmentService>) -> Endpoint {
    endpoint(service, |service, ctx, request| async move {
        let EndpointRequest::Available = request else {
            return Err(AppointmentError::TypeAssertion("Available"));
        };
        let responses = service.find_available(&ctx).await?;
        Ok(EndpointResponse::Appointments(responses))
    })
}

pub fn assign_appointment(service: Arc<dyn AppointmentService>) -> Endpoint {
    endpoint(service, |service, ctx, request| async move {
        let EndpointRequest::AssignOrCancel(AssignOrCancel { id, user_id }) = request else {
            return Err(AppointmentError::TypeAssertion("AssignOrCancel"));
        };
        let response = service.assign_appointment(&ctx, &id, user_id).await?;
        Ok(EndpointResponse::Appointment(response))
    })
}

pub fn cancel_appointment(service: Arc<dyn AppointmentService>) -> Endpoint {
    endpoint(service, |service, ctx, request| async move {
        let EndpointRequest::AssignOrCancel(AssignOrCancel { id, user_id }) = request else {
            return Err(AppointmentError::TypeAssertion("AssignOrCancel"));
        };
        let response = service.cancel_appointment(&ctx, &id, user_id).await?;
        Ok(EndpointResponse::Appointment(response))
    })
}

pub fn delete_appointment(service: Arc<dyn AppointmentService>) -> Endpoint {
    endpoint(service, |service, ctx, request| async move {
        let EndpointRequest::Delete(DeleteAppointment { id }) = request else {
            return Err(AppointmentError::TypeAssertion("DeleteAppointment"));
        };
        service.delete_appointment(&ctx, &id).await?;
        Ok(EndpointResponse::Empty)
    })
}

/// Dispatch table from use case to endpoint, built once at startup.
#[derive(Clone)]
pub struct EndpointSet {
    endpoints: HashMap<UseCase, Endpoint>,
}

impl EndpointSet {
    /// Registers every use case against the given service.
    pub fn new(service: Arc<dyn AppointmentService>) -> Self {
        let endpoints = UseCase::ALL
            .into_iter()
            .map(|use_case| {
                let service = service.clone();
                let endpoint = match use_case {
                    UseCase::CreateAppointment => create_appointment(service),
                    UseCase::UpdateAppointment => update_appointment(service),
                    UseCase::FindAppointmentById => find_appointment_by_id(service),
                    UseCase::FindAllAppointments => find_all_appointments(service),
                    UseCase::FindAppointmentByUser => find_appointment_by_user(service),
                    UseCase::FindAppointmentBySalon => find_appointment_by_salon(service),
                    UseCase::AvailableAppointments => available_appointments(service),
                    UseCase::AssignAppointment => assign_appointment(service),
                    UseCase::CancelAppointment => cancel_appointment(service),
                    UseCase::DeleteAppointment => delete_appointment(service),
                };
                (use_case, endpoint)
            })
            .collect();

        Self { endpoints }
    }

    pub fn get(&self, use_case: UseCase) -> Option<&Endpoint> {
        self.endpoints.get(&use_case)
    }

    /// Invokes the endpoint registered for `use_case`.
    pub async fn call(
        &self,
        use_case: UseCase,
        ctx: Context,
        request: EndpointRequest,
    ) -> Result<EndpointResponse> {
        let Some(endpoint) = self.get(use_case) else {
            return Err(AppointmentError::TypeAssertion("registered endpoint"));
        };
        tracing::trace!(%use_case, request_id = %ctx.request_id(), "Dispatching endpoint");
        endpoint(ctx, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::service::Service;
    use crate::storage::InMemoryRepository;

    fn endpoints() -> EndpointSet {
        let repo = Arc::new(InMemoryRepository::new());
        let service = Service::new(None, Some(repo), None).unwrap();
        EndpointSet::new(Arc::new(service))
    }

    fn upsert() -> UpsertAppointment {
        UpsertAppointment::new(1, Utc.with_ymd_and_hms(2022, 6, 23, 21, 12, 2).unwrap())
    }

    #[test]
    fn test_every_use_case_is_registered() {
        let set = endpoints();
        for use_case in UseCase::ALL {
            assert!(set.get(use_case).is_some(), "{use_case} missing");
        }
    }

    #[test]
    fn test_use_case_names() {
        assert_eq!(UseCase::FindAppointmentById.to_string(), "findAppointmentByID");
        assert_eq!(UseCase::AvailableAppointments.as_str(), "availableAppointments");
    }

    #[tokio::test]
    async fn test_mismatched_request_is_type_assertion() {
        let set = endpoints();

        let result = set
            .call(
                UseCase::FindAppointmentById,
                Context::new(),
                EndpointRequest::FindAll,
            )
            .await;

        assert_eq!(result, Err(AppointmentError::TypeAssertion("FindById")));
    }

    #[tokio::test]
    async fn test_create_then_find_through_table() {
        let set = endpoints();

        let created = set
            .call(
                UseCase::CreateAppointment,
                Context::new(),
                EndpointRequest::Upsert(upsert()),
            )
            .await
            .unwrap();
        let EndpointResponse::Appointment(created) = created else {
            panic!("expected a single appointment");
        };

        let found = set
            .call(
                UseCase::FindAppointmentById,
                Context::new(),
                EndpointRequest::FindById(FindById {
                    id: created.id.clone(),
                }),
            )
            .await
            .unwrap();

        assert_eq!(found, EndpointResponse::Appointment(created));
    }

    #[tokio::test]
    async fn test_service_errors_pass_through_unchanged() {
        let set = endpoints();

        let result = set
            .call(
                UseCase::DeleteAppointment,
                Context::new(),
                EndpointRequest::Delete(DeleteAppointment {
                    id: "missing".to_string(),
                }),
            )
            .await;

        assert_eq!(result, Err(AppointmentError::NotFound("missing".to_string())));
    }

    #[test]
    fn test_response_serializes_untagged() {
        assert_eq!(
            serde_json::to_string(&EndpointResponse::Appointments(vec![])).unwrap(),
            "[]"
        );
        assert_eq!(
            serde_json::to_string(&EndpointResponse::Empty).unwrap(),
            "null"
        );
    }
}
