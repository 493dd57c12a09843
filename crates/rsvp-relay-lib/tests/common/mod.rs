//! In-process stand-in for the Resend API.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Router,
};
use serde_json::Value;

use rsvp_relay_lib::{RelayConfig, RsvpRelay};

/// What the fake provider answers with.
#[derive(Clone)]
pub enum Reply {
    Json(StatusCode, Value),
    Raw(StatusCode, &'static str),
    Stall(Duration),
}

/// One request as seen by the fake provider.
#[derive(Debug, Clone)]
pub struct Captured {
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct ProviderState {
    reply: Reply,
    captured: Arc<Mutex<Vec<Captured>>>,
}

/// Handle to a running fake provider.
pub struct FakeProvider {
    pub addr: SocketAddr,
    captured: Arc<Mutex<Vec<Captured>>>,
}

impl FakeProvider {
    /// Start a provider on an ephemeral port answering every call with `reply`.
    pub async fn start(reply: Reply) -> Self {
        let captured = Arc::new(Mutex::new(Vec::new()));
        let state = ProviderState {
            reply,
            captured: Arc::clone(&captured),
        };

        let app = Router::new()
            .route("/emails", post(emails))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake provider");
        let addr = listener.local_addr().expect("fake provider address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake provider");
        });

        Self { addr, captured }
    }

    pub fn endpoint(&self) -> String {
        format!("http://{}/emails", self.addr)
    }

    /// Requests received so far.
    pub fn captured(&self) -> Vec<Captured> {
        self.captured.lock().expect("captured lock").clone()
    }

    /// A relay pointed at this provider.
    pub fn relay(&self) -> RsvpRelay {
        self.relay_with(RelayConfig::new("re_test_key", "couple@example.com"))
    }

    pub fn relay_with(&self, config: RelayConfig) -> RsvpRelay {
        RsvpRelay::new(config.with_endpoint(self.endpoint())).expect("relay should build")
    }
}

async fn emails(
    State(state): State<ProviderState>,
    headers: HeaderMap,
    body: Bytes,
) -> axum::response::Response {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    state.captured.lock().expect("captured lock").push(Captured {
        authorization: header("authorization"),
        content_type: header("content-type"),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });

    match state.reply {
        Reply::Json(status, value) => (status, axum::Json(value)).into_response(),
        Reply::Raw(status, text) => (status, text).into_response(),
        Reply::Stall(delay) => {
            tokio::time::sleep(delay).await;
            (StatusCode::OK, axum::Json(serde_json::json!({"id": "late"}))).into_response()
        }
    }
}
