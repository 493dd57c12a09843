//! RSVP relay library entry points.
//!
//! This crate turns a wedding RSVP form submission into a notification email
//! and hands it to the Resend API. Hosting adapters (the Lambda function and
//! the HTTP service) should only call [`RsvpRelay`] instead of reimplementing
//! any part of the pipeline.
//!

#![deny(warnings)]

pub mod config;
pub mod email;
pub mod error;
pub mod escape;
pub mod relay;
pub mod resend;
pub mod submission;

pub use config::{ConfigError, RelayConfig};
pub use email::NotificationEmail;
pub use error::{RelayError, Result, StartupError};
pub use escape::escape_html;
pub use relay::{RelayResponse, ResponseBody, RsvpRelay};
pub use resend::{DeliveryReceipt, ResendClient};
pub use submission::RsvpSubmission;
