//! Startup configuration for the relay.
//!
//! Configuration is read from the environment exactly once, when a hosting
//! adapter starts, and injected into [`crate::RsvpRelay`]. Nothing re-reads the
//! environment per request.
//!
//! # Environment Variables
//!
//! - `RESEND_API_KEY`: provider API key (required)
//! - `RSVP_TO_EMAIL`: recipient of every notification (required)
//! - `RSVP_FROM_EMAIL`: sender address (default: `Wedding RSVP <onboarding@resend.dev>`)
//! - `RESEND_API_URL`: provider endpoint (default: `https://api.resend.com/emails`)
//! - `RSVP_PROVIDER_TIMEOUT_SECS`: outbound request timeout in seconds (default: 10)

use std::fmt;
use std::time::Duration;

use thiserror::Error;

pub const API_KEY_ENV: &str = "RESEND_API_KEY";
pub const RECIPIENT_ENV: &str = "RSVP_TO_EMAIL";
pub const SENDER_ENV: &str = "RSVP_FROM_EMAIL";
pub const ENDPOINT_ENV: &str = "RESEND_API_URL";
pub const TIMEOUT_ENV: &str = "RSVP_PROVIDER_TIMEOUT_SECS";

pub const DEFAULT_SENDER: &str = "Wedding RSVP <onboarding@resend.dev>";
pub const DEFAULT_ENDPOINT: &str = "https://api.resend.com/emails";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors raised while loading [`RelayConfig`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    #[error("required environment variable {name} is not set")]
    Missing { name: &'static str },

    /// The timeout variable is not a positive whole number of seconds.
    #[error("{name} must be a positive number of seconds, got '{value}'")]
    InvalidTimeout { name: &'static str, value: String },
}

impl ConfigError {
    /// Missing secrets leave the relay running in an unconfigured state;
    /// anything else is fatal at startup.
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing { .. })
    }
}

/// Validated relay configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// Bearer token for the provider API.
    pub api_key: String,
    /// Single recipient of every notification.
    pub recipient: String,
    /// `From` header of every notification.
    pub sender: String,
    /// Provider endpoint receiving the `POST`.
    pub endpoint: String,
    /// Upper bound on the outbound call.
    pub timeout: Duration,
}

impl RelayConfig {
    /// Build a configuration with default sender, endpoint and timeout.
    pub fn new(api_key: impl Into<String>, recipient: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            recipient: recipient.into(),
            sender: DEFAULT_SENDER.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the provider endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Override the sender address.
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = sender.into();
        self
    }

    /// Override the outbound timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load the configuration through an arbitrary variable lookup.
    ///
    /// Tests use this to avoid mutating the global environment, which would
    /// race between tests running in parallel.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_key = read(API_KEY_ENV).ok_or(ConfigError::Missing { name: API_KEY_ENV })?;
        let recipient = read(RECIPIENT_ENV).ok_or(ConfigError::Missing {
            name: RECIPIENT_ENV,
        })?;

        let timeout = match read(TIMEOUT_ENV) {
            Some(raw) => parse_timeout(&raw)?,
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            api_key,
            recipient,
            sender: read(SENDER_ENV).unwrap_or_else(|| DEFAULT_SENDER.to_string()),
            endpoint: read(ENDPOINT_ENV).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            timeout,
        })
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout {
            name: TIMEOUT_ENV,
            value: raw.to_string(),
        }),
    }
}

// The API key stays out of logs.
impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("api_key", &"<redacted>")
            .field("recipient", &self.recipient)
            .field("sender", &self.sender)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish()
    }
}
