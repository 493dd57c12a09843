//! The relay pipeline: one inbound submission, one provider call.
//!
//! ```text
//! method guard -> config guard -> parse -> source URL -> validate
//!     -> compose -> provider call -> response translation
//! ```
//!
//! Every stage returns [`RelayError`] on failure. [`RsvpRelay::handle`] is the
//! only place a failure becomes an HTTP status and body.

use std::sync::Arc;

use http::{HeaderMap, Method, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn, Level};

use crate::config::{ConfigError, RelayConfig};
use crate::email::NotificationEmail;
use crate::error::{RelayError, Result, StartupError};
use crate::resend::{DeliveryReceipt, ResendClient};
use crate::submission::RsvpSubmission;

/// JSON body returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseBody {
    /// `{ok: true, id}` after the provider accepted the email.
    Delivered { ok: bool, id: Option<String> },
    /// `{error}` for every failure.
    Error { error: String },
}

/// Status and body produced for one inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayResponse {
    pub status: StatusCode,
    pub body: ResponseBody,
}

impl RelayResponse {
    /// 200 response for an accepted email.
    pub fn delivered(receipt: DeliveryReceipt) -> Self {
        Self {
            status: StatusCode::OK,
            body: ResponseBody::Delivered {
                ok: true,
                id: receipt.id,
            },
        }
    }

    /// Error response for `err`, using its public status and message.
    pub fn from_error(err: &RelayError) -> Self {
        Self {
            status: err.status(),
            body: ResponseBody::Error {
                error: err.public_message(),
            },
        }
    }

    /// Serialized JSON body.
    pub fn body_json(&self) -> String {
        // A two-variant enum of strings, bools and options always serializes.
        serde_json::to_string(&self.body).unwrap_or_else(|_| String::from("{}"))
    }
}

struct Configured {
    config: RelayConfig,
    client: ResendClient,
}

/// The RSVP relay handler.
///
/// Cheap to clone; all state is immutable and shared. A relay built with
/// [`RsvpRelay::unconfigured`] answers every `POST` with the configuration
/// error instead of refusing to start.
#[derive(Clone)]
pub struct RsvpRelay {
    inner: Option<Arc<Configured>>,
}

impl RsvpRelay {
    /// Build a relay around a validated configuration.
    pub fn new(config: RelayConfig) -> std::result::Result<Self, StartupError> {
        let client = ResendClient::new(&config)?;
        Ok(Self {
            inner: Some(Arc::new(Configured { config, client })),
        })
    }

    /// A relay without provider credentials.
    pub fn unconfigured() -> Self {
        Self { inner: None }
    }

    /// Build a relay from the process environment.
    pub fn from_env() -> std::result::Result<Self, StartupError> {
        Self::from_config(RelayConfig::from_env())
    }

    /// Build a relay from a configuration load result.
    ///
    /// Missing secrets produce an unconfigured relay and an error log entry;
    /// any other configuration problem is returned to abort startup.
    pub fn from_config(
        loaded: std::result::Result<RelayConfig, ConfigError>,
    ) -> std::result::Result<Self, StartupError> {
        match loaded {
            Ok(config) => {
                info!(
                    endpoint = %config.endpoint,
                    timeout_secs = config.timeout.as_secs(),
                    "relay configured"
                );
                Self::new(config)
            }
            Err(err) if err.is_missing() => {
                error!(error = %err, "relay is not configured; RSVP submissions will be rejected");
                Ok(Self::unconfigured())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Whether provider credentials are present.
    pub fn is_configured(&self) -> bool {
        self.inner.is_some()
    }

    /// Access the configuration, if any.
    pub fn config(&self) -> Option<&RelayConfig> {
        self.inner.as_deref().map(|configured| &configured.config)
    }

    /// Handle one inbound request and translate the outcome to HTTP terms.
    pub async fn handle(&self, method: &Method, headers: &HeaderMap, body: &[u8]) -> RelayResponse {
        match self.relay(method, headers, body).await {
            Ok(receipt) => RelayResponse::delivered(receipt),
            Err(err) => {
                report(&err);
                RelayResponse::from_error(&err)
            }
        }
    }

    /// Run the pipeline, returning the provider receipt or the first failure.
    pub async fn relay(
        &self,
        method: &Method,
        headers: &HeaderMap,
        body: &[u8],
    ) -> Result<DeliveryReceipt> {
        if *method != Method::POST {
            return Err(RelayError::MethodNotAllowed);
        }

        let configured = self.inner.as_deref().ok_or(RelayError::NotConfigured)?;

        let submission = RsvpSubmission::from_json_bytes(body)?;
        let source_url = submission.source_url(headers);
        submission.validate()?;

        let email = NotificationEmail::compose(&configured.config, &submission, &source_url);

        info!(slug = %submission.slug, "relaying RSVP submission");
        let receipt = configured.client.send(&email).await?;
        info!(
            slug = %submission.slug,
            id = receipt.id.as_deref().unwrap_or("-"),
            "provider accepted RSVP notification"
        );

        Ok(receipt)
    }
}

impl std::fmt::Debug for RsvpRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsvpRelay")
            .field("config", &self.config())
            .finish()
    }
}

fn report(err: &RelayError) {
    match log_level(err) {
        Some(Level::ERROR) => error!(error = %err, "RSVP relay failed"),
        Some(_) => {
            if let RelayError::Provider { status, message } = err {
                warn!(provider_status = *status, message = %message, "provider rejected RSVP notification");
            }
        }
        None => {}
    }
}

/// Caller mistakes stay silent, and so does the missing configuration, which
/// is reported once when the relay is built.
fn log_level(err: &RelayError) -> Option<Level> {
    match err {
        RelayError::Provider { .. } => Some(Level::WARN),
        err if err.is_internal() => Some(Level::ERROR),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{API_KEY_ENV, RECIPIENT_ENV, TIMEOUT_ENV};

    fn unreachable_config() -> RelayConfig {
        // Nothing listens here; these tests never reach the provider.
        RelayConfig::new("re_test", "couple@example.com").with_endpoint("http://127.0.0.1:9/emails")
    }

    #[tokio::test]
    async fn test_non_post_is_rejected_first() {
        let relay = RsvpRelay::unconfigured();
        for method in [Method::GET, Method::PUT, Method::DELETE, Method::OPTIONS] {
            let response = relay.handle(&method, &HeaderMap::new(), b"").await;
            assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
            assert_eq!(
                response.body,
                ResponseBody::Error {
                    error: "Method Not Allowed".to_string()
                }
            );
        }
    }

    #[tokio::test]
    async fn test_unconfigured_relay_rejects_valid_submission() {
        let relay = RsvpRelay::unconfigured();
        let response = relay
            .handle(&Method::POST, &HeaderMap::new(), br#"{"attendance":"yes"}"#)
            .await;
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.body_json(),
            r#"{"error":"Server env is not configured"}"#
        );
    }

    #[tokio::test]
    async fn test_config_guard_runs_before_body_parsing() {
        let relay = RsvpRelay::unconfigured();
        let response = relay
            .handle(&Method::POST, &HeaderMap::new(), b"{broken")
            .await;
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_missing_attendance_is_bad_request() {
        let relay = RsvpRelay::new(unreachable_config()).unwrap();
        let response = relay
            .handle(&Method::POST, &HeaderMap::new(), br#"{"coupleNames":"A&B"}"#)
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            response.body_json(),
            r#"{"error":"Missing required fields"}"#
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let relay = RsvpRelay::new(unreachable_config()).unwrap();
        let response = relay
            .handle(&Method::POST, &HeaderMap::new(), b"{\"attendance\":")
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body_json(), r#"{"error":"Invalid JSON body"}"#);
    }

    #[test]
    fn test_log_level_per_failure_class() {
        let provider = RelayError::Provider {
            status: 422,
            message: "invalid recipient".to_string(),
        };
        assert_eq!(log_level(&provider), Some(Level::WARN));

        let unreadable = serde_json::from_slice::<serde_json::Value>(b"<html>").unwrap_err();
        assert_eq!(
            log_level(&RelayError::ProviderResponse(unreadable)),
            Some(Level::ERROR)
        );

        assert_eq!(log_level(&RelayError::NotConfigured), None);
        assert_eq!(log_level(&RelayError::MissingFields), None);
        assert_eq!(log_level(&RelayError::MethodNotAllowed), None);
    }

    #[test]
    fn test_delivered_body_serializes_null_id() {
        let response = RelayResponse::delivered(DeliveryReceipt { id: None });
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body_json(), r#"{"ok":true,"id":null}"#);
    }

    #[test]
    fn test_from_config_tolerates_missing_secrets() {
        let relay = RsvpRelay::from_config(Err(ConfigError::Missing { name: API_KEY_ENV }))
            .expect("missing secrets should not abort startup");
        assert!(!relay.is_configured());
        assert!(relay.config().is_none());

        let relay = RsvpRelay::from_config(Err(ConfigError::Missing {
            name: RECIPIENT_ENV,
        }))
        .unwrap();
        assert!(!relay.is_configured());
    }

    #[test]
    fn test_from_config_rejects_invalid_timeout() {
        let result = RsvpRelay::from_config(Err(ConfigError::InvalidTimeout {
            name: TIMEOUT_ENV,
            value: "never".to_string(),
        }));
        assert!(matches!(result, Err(StartupError::Config(_))));
    }

    #[test]
    fn test_debug_hides_api_key() {
        let relay = RsvpRelay::new(unreachable_config()).unwrap();
        let debug = format!("{:?}", relay);
        assert!(debug.contains("RsvpRelay"));
        assert!(!debug.contains("re_test"));
    }
}
