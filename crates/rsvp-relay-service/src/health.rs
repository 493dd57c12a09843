//! Health check handlers for Kubernetes probes.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use rsvp_relay_lib::RsvpRelay;

use crate::{SERVICE_NAME, SERVICE_VERSION};

/// Health status response for liveness and readiness probes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// "ok" or "not_ready: <reason>".
    pub status: String,
    pub service: String,
    pub version: String,

    /// Whether provider credentials are loaded (readiness only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relay_configured: Option<bool>,
}

impl HealthStatus {
    pub fn alive(service: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            relay_configured: None,
        }
    }

    pub fn ready(service: &str, version: &str) -> Self {
        Self {
            relay_configured: Some(true),
            ..Self::alive(service, version)
        }
    }

    pub fn not_ready(service: &str, version: &str, reason: &str) -> Self {
        Self {
            status: format!("not_ready: {}", reason),
            service: service.to_string(),
            version: version.to_string(),
            relay_configured: Some(false),
        }
    }
}

/// `GET /health/live`: 200 whenever the process is serving.
pub async fn health_live() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthStatus::alive(SERVICE_NAME, SERVICE_VERSION)))
}

/// `GET /health/ready`: 503 while provider credentials are missing.
pub async fn health_ready(State(relay): State<RsvpRelay>) -> Response {
    if !relay.is_configured() {
        let status =
            HealthStatus::not_ready(SERVICE_NAME, SERVICE_VERSION, "relay is not configured");
        return (StatusCode::SERVICE_UNAVAILABLE, Json(status)).into_response();
    }

    (StatusCode::OK, Json(HealthStatus::ready(SERVICE_NAME, SERVICE_VERSION))).into_response()
}
