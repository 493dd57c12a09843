//! Client for the Resend transactional email API.

use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::config::RelayConfig;
use crate::email::NotificationEmail;
use crate::error::{RelayError, Result, PROVIDER_FALLBACK_MESSAGE};

/// Provider acknowledgement of an accepted email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    /// Provider-assigned message identifier, when one was returned.
    pub id: Option<String>,
}

/// Sends notifications to the provider with a single attempt per email.
#[derive(Clone)]
pub struct ResendClient {
    http: Client,
    endpoint: String,
    api_key: String,
}

impl ResendClient {
    /// Build a client honouring the configured endpoint and timeout.
    pub fn new(config: &RelayConfig) -> reqwest::Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("rsvp-relay/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Endpoint receiving the `POST`.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Submit `email` and classify the provider's answer.
    ///
    /// A non-JSON answer is an internal failure even when the status is an
    /// error, since the provider contract promises JSON either way.
    pub async fn send(&self, email: &NotificationEmail) -> Result<DeliveryReceipt> {
        debug!(endpoint = %self.endpoint, "posting notification to provider");

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        let body: Value = serde_json::from_slice(&bytes).map_err(RelayError::ProviderResponse)?;

        if !status.is_success() {
            return Err(RelayError::Provider {
                status: status.as_u16(),
                message: text_field(&body, "message")
                    .unwrap_or_else(|| PROVIDER_FALLBACK_MESSAGE.to_string()),
            });
        }

        Ok(DeliveryReceipt {
            id: text_field(&body, "id"),
        })
    }
}

impl std::fmt::Debug for ResendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResendClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

fn text_field(body: &Value, key: &str) -> Option<String> {
    body.get(key)
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
