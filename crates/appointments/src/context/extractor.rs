//! Axum extractor for RequestContext.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use uuid::Uuid;

use appointments_core::context::Context;

use super::types::{RequestContext, RequestId};
use crate::state::AppState;

fn extract_request_id(headers: &HeaderMap) -> RequestId {
    headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .map(RequestId::from_uuid)
        .unwrap_or_else(RequestId::new)
}

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let request_id = extract_request_id(&parts.headers);
        let context = Context::new()
            .with_request_id(request_id.as_uuid())
            .with_timeout(state.request_timeout)
            .with_cancellation(state.subscribe_shutdown());

        Ok(RequestContext {
            request_id,
            context,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[test]
    fn test_extract_request_id_from_header() {
        let mut headers = HeaderMap::new();
        let id = "550e8400-e29b-41d4-a716-446655440000";
        headers.insert("x-request-id", id.parse().unwrap());

        let request_id = extract_request_id(&headers);
        assert_eq!(request_id.to_string(), id);
    }

    #[test]
    fn test_extract_request_id_generates_when_invalid() {
        let mut headers = HeaderMap::new();
        headers.insert("x-request-id", "not-a-uuid".parse().unwrap());

        let request_id = extract_request_id(&headers);

        Uuid::parse_str(&request_id.to_string()).expect("Should be valid UUID");
    }

    #[tokio::test]
    async fn test_context_carries_request_id() {
        let state = AppState::default();
        let id = Uuid::new_v4();
        let (mut parts, _) = Request::builder()
            .header("x-request-id", id.to_string())
            .body(())
            .unwrap()
            .into_parts();

        let ctx = RequestContext::from_request_parts(&mut parts, &state)
            .await
            .unwrap();

        assert_eq!(ctx.request_id.as_uuid(), id);
        assert_eq!(ctx.context.request_id(), id);
        assert!(!ctx.context.is_cancelled());
    }

    #[tokio::test]
    async fn test_context_cancelled_after_shutdown() {
        let state = AppState::default();
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();

        let ctx = RequestContext::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        state.signal_shutdown();

        assert!(ctx.context.is_cancelled());
    }
}
