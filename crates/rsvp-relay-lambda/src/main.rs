//! AWS Lambda function for RSVP submissions.
//!
//! Configuration is read once at cold start. See `rsvp_relay_lib::config` for
//! the environment variables.

use lambda_http::{run, service_fn, Error, Request};
use tracing::info;

use rsvp_relay_lambda::{handle_request, init_tracing};
use rsvp_relay_lib::RsvpRelay;

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();

    let relay = RsvpRelay::from_env()?;
    info!(configured = relay.is_configured(), "RSVP relay function starting");

    run(service_fn(move |event: Request| {
        let relay = relay.clone();
        async move { handle_request(&relay, event).await }
    }))
    .await
}
