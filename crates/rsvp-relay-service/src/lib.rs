//! HTTP hosting for the RSVP relay.
//!
//! The service is a thin axum shell around [`rsvp_relay_lib::RsvpRelay`]:
//!
//! - `ANY /api/rsvp` - relay a submission (non-POST methods get the 405 body)
//! - `GET /health/live` - Kubernetes liveness probe
//! - `GET /health/ready` - Kubernetes readiness probe
//!
//! - [`logging`]: JSON or text log output
//! - [`middleware`]: request IDs and the per-request tracing span

#![deny(warnings)]

mod health;
pub mod logging;
pub mod middleware;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method},
    response::{IntoResponse, Response},
    routing::{any, get},
};
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::Level;

use rsvp_relay_lib::{RelayResponse, RsvpRelay};

pub use health::{HealthStatus, health_live, health_ready};
pub use logging::{LogFormat, init_logging};
pub use middleware::{MakeRequestUuidV7, REQUEST_ID_HEADER, RequestSpan};

/// Path of the RSVP endpoint.
pub const RSVP_PATH: &str = "/api/rsvp";

/// Name reported by health checks and on every request span.
pub const SERVICE_NAME: &str = env!("CARGO_PKG_NAME");
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build the service router around `relay`.
pub fn build_router(relay: RsvpRelay) -> Router {
    Router::new()
        .route(RSVP_PATH, any(rsvp_handler))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, MakeRequestUuidV7))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(RequestSpan)
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER)),
        )
        .with_state(relay)
}

/// Axum wrapper for a relay outcome.
struct RelayReply(RelayResponse);

impl IntoResponse for RelayReply {
    fn into_response(self) -> Response {
        (self.0.status, Json(self.0.body)).into_response()
    }
}

async fn rsvp_handler(
    State(relay): State<RsvpRelay>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> RelayReply {
    RelayReply(relay.handle(&method, &headers, &body).await)
}
