//! Request correlation for the service.
//!
//! The router wraps itself in `tower-http` layers: `SetRequestIdLayer` reuses
//! or generates (via [`MakeRequestUuidV7`]) the `X-Request-ID`, the trace
//! layer opens a [`RequestSpan`] recording it, and `PropagateRequestIdLayer`
//! echoes it on the response.

use axum::http::{HeaderName, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use tower_http::trace::MakeSpan;
use tracing::{Span, info_span};
use uuid::Uuid;

use crate::SERVICE_NAME;

/// Header carrying the correlation ID in both directions.
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Generates UUID v7 request IDs, which sort by creation time.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::now_v7().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Opens the `request` span every log line of a request is attached to.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let request_id = request
            .headers()
            .get(&REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("-");

        info_span!(
            "request",
            service = SERVICE_NAME,
            request_id = %request_id,
            method = %request.method(),
            path = %request.uri().path(),
        )
    }
}
