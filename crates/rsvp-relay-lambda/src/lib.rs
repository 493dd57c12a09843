//! AWS Lambda hosting for the RSVP relay.
//!
//! - [`handle_request`]: converts an API Gateway / function URL event into a
//!   relay call and back
//! - [`init_tracing`]: JSON-formatted tracing for CloudWatch Logs

#![deny(warnings)]

mod handler;
mod tracing_init;

pub use handler::{handle_request, into_lambda_response};
pub use tracing_init::init_tracing;
