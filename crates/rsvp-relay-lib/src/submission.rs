//! Inbound RSVP form payload.

use http::HeaderMap;
use serde_json::{Map, Number, Value};

use crate::error::{RelayError, Result};

/// Slug used when the form does not name an invitation page.
pub const DEFAULT_SLUG: &str = "default";

/// Scheme assumed when no `x-forwarded-proto` header is present.
const DEFAULT_PROTOCOL: &str = "https";

/// An RSVP form submission with defaults applied.
///
/// Every field is a plain string by the time a submission exists; coercion of
/// JSON scalars happens in [`RsvpSubmission::from_json_bytes`] and nowhere
/// else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsvpSubmission {
    pub slug: String,
    pub invitation_title: String,
    pub couple_names: String,
    pub greeting: String,
    pub attendance: String,
    pub wish: String,
}

impl Default for RsvpSubmission {
    fn default() -> Self {
        Self {
            slug: DEFAULT_SLUG.to_string(),
            invitation_title: String::new(),
            couple_names: String::new(),
            greeting: String::new(),
            attendance: String::new(),
            wish: String::new(),
        }
    }
}

impl RsvpSubmission {
    /// Parse a request body.
    ///
    /// An empty body, or JSON that is not an object, yields the default
    /// submission. Malformed JSON is rejected with [`RelayError::InvalidBody`].
    pub fn from_json_bytes(body: &[u8]) -> Result<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        let value: Value = serde_json::from_slice(body).map_err(RelayError::InvalidBody)?;
        Self::from_value(&value)
    }

    /// Build a submission from an already-parsed JSON value.
    pub fn from_value(value: &Value) -> Result<Self> {
        let Some(fields) = value.as_object() else {
            return Ok(Self::default());
        };

        Ok(Self {
            slug: text_field(fields, "slug")?.unwrap_or_else(|| DEFAULT_SLUG.to_string()),
            invitation_title: text_field(fields, "invitationTitle")?.unwrap_or_default(),
            couple_names: text_field(fields, "coupleNames")?.unwrap_or_default(),
            greeting: text_field(fields, "greeting")?.unwrap_or_default(),
            attendance: text_field(fields, "attendance")?.unwrap_or_default(),
            wish: text_field(fields, "wish")?.unwrap_or_default(),
        })
    }

    /// Reject submissions without an attendance answer.
    pub fn validate(&self) -> Result<()> {
        if self.attendance.is_empty() {
            return Err(RelayError::MissingFields);
        }
        Ok(())
    }

    /// Path of the invitation page the guest answered from.
    pub fn source_path(&self) -> String {
        if self.slug == DEFAULT_SLUG {
            "/".to_string()
        } else {
            format!("/{}", self.slug)
        }
    }

    /// Reconstruct the guest-facing URL from forwarding headers.
    ///
    /// Degrades to the bare path when no host header is present. The result
    /// is display-only and must never drive authorization or redirects.
    pub fn source_url(&self, headers: &HeaderMap) -> String {
        let path = self.source_path();
        let host = header_text(headers, "x-forwarded-host").or_else(|| header_text(headers, "host"));

        match host {
            Some(host) => {
                let protocol = header_text(headers, "x-forwarded-proto").unwrap_or(DEFAULT_PROTOCOL);
                format!("{}://{}{}", protocol, host, path)
            }
            None => path,
        }
    }
}

fn text_field(fields: &Map<String, Value>, key: &'static str) -> Result<Option<String>> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(Value::Number(number)) => Ok(Some(number_text(number))),
        Some(Value::Bool(flag)) => Ok(Some(flag.to_string())),
        Some(Value::Array(_)) | Some(Value::Object(_)) => {
            Err(RelayError::InvalidFieldType { field: key })
        }
    }
}

/// Whole-valued floats render without a fraction, so `1e3` and `1.0` read the
/// same as the integers a browser would send.
fn number_text(number: &Number) -> String {
    match number.as_f64() {
        Some(value) if number.is_f64() && value.fract() == 0.0 && value.abs() < 1e21 => {
            if value == 0.0 {
                "0".to_string()
            } else {
                format!("{:.0}", value)
            }
        }
        _ => number.to_string(),
    }
}

fn header_text<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
}
