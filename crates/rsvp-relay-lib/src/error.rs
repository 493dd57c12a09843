use http::StatusCode;
use thiserror::Error;

use crate::config::ConfigError;

/// Convenient result alias for the RSVP relay library.
pub type Result<T> = std::result::Result<T, RelayError>;

/// Public message returned for any failure whose details stay server-side.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Fallback message when the provider rejects a request without explaining why.
pub const PROVIDER_FALLBACK_MESSAGE: &str = "Resend request failed";

/// Every way a relay attempt can fail.
///
/// Each pipeline stage returns this type; translation into an HTTP status and
/// a caller-facing message happens once, at the hosting boundary, through
/// [`RelayError::status`] and [`RelayError::public_message`].
#[derive(Debug, Error)]
pub enum RelayError {
    /// The inbound request used a method other than `POST`.
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    /// The provider API key or recipient address was not configured.
    #[error("Server env is not configured")]
    NotConfigured,

    /// The submission did not carry an `attendance` answer.
    #[error("Missing required fields")]
    MissingFields,

    /// The request body was not valid JSON.
    #[error("Invalid JSON body")]
    InvalidBody(#[source] serde_json::Error),

    /// A submission field held an array or object.
    #[error("Invalid field type: {field}")]
    InvalidFieldType { field: &'static str },

    /// The provider answered with a non-success status.
    #[error("{message}")]
    Provider { status: u16, message: String },

    /// The provider could not be reached or timed out.
    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a body that was not JSON.
    #[error("provider returned an unreadable response body: {0}")]
    ProviderResponse(#[source] serde_json::Error),
}

impl RelayError {
    /// HTTP status reported to the caller for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::MissingFields | Self::InvalidBody(_) | Self::InvalidFieldType { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::Provider { .. } => StatusCode::BAD_GATEWAY,
            Self::NotConfigured | Self::Transport(_) | Self::ProviderResponse(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message placed in the `error` field of the response body.
    ///
    /// Internal failures collapse to [`INTERNAL_ERROR_MESSAGE`] so transport
    /// details never reach the caller.
    pub fn public_message(&self) -> String {
        if self.is_internal() {
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }

    /// True for failures that are logged server-side and hidden from the caller.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::ProviderResponse(_))
    }

    /// True for failures caused by the caller's request.
    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }
}

/// Errors that prevent a hosting adapter from starting at all.
#[derive(Debug, Error)]
pub enum StartupError {
    /// Configuration was present but invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The outbound HTTP client could not be built.
    #[error("failed to build provider client: {0}")]
    Client(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_error() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("{not json").unwrap_err()
    }

    #[test]
    fn test_client_errors_map_to_4xx() {
        assert_eq!(
            RelayError::MethodNotAllowed.status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(RelayError::MissingFields.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            RelayError::InvalidBody(json_error()).status(),
            StatusCode::BAD_REQUEST
        );
        assert!(RelayError::InvalidFieldType { field: "wish" }.is_client_error());
    }

    #[test]
    fn test_public_messages_match_wire_contract() {
        assert_eq!(
            RelayError::MethodNotAllowed.public_message(),
            "Method Not Allowed"
        );
        assert_eq!(
            RelayError::NotConfigured.public_message(),
            "Server env is not configured"
        );
        assert_eq!(
            RelayError::MissingFields.public_message(),
            "Missing required fields"
        );
        assert_eq!(
            RelayError::InvalidFieldType { field: "slug" }.public_message(),
            "Invalid field type: slug"
        );
    }

    #[test]
    fn test_provider_error_surfaces_message_as_bad_gateway() {
        let err = RelayError::Provider {
            status: 422,
            message: "invalid recipient".to_string(),
        };
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.public_message(), "invalid recipient");
        assert!(!err.is_internal());
    }

    #[test]
    fn test_internal_errors_are_opaque() {
        let err = RelayError::ProviderResponse(json_error());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), INTERNAL_ERROR_MESSAGE);
        assert!(err.is_internal());
        assert!(err.to_string().contains("unreadable"));
    }

    #[test]
    fn test_not_configured_is_server_error_but_not_opaque() {
        let err = RelayError::NotConfigured;
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.is_internal());
        assert!(!err.is_client_error());
    }
}
