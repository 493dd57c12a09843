//! Conversion between API Gateway events and the relay pipeline.

use lambda_http::{http::header::CONTENT_TYPE, Body, Error, Request, RequestExt, Response};
use tracing::{info_span, Instrument};

use rsvp_relay_lib::{RelayResponse, RsvpRelay};

/// Handle one function invocation.
///
/// The path is not checked; API Gateway or the function URL decides which
/// requests reach this function.
pub async fn handle_request(relay: &RsvpRelay, event: Request) -> Result<Response<Body>, Error> {
    let request_id = event
        .lambda_context_ref()
        .map(|ctx| ctx.request_id.clone())
        .unwrap_or_else(|| "-".to_string());
    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %event.method(),
        path = %event.uri().path(),
    );

    let outcome = relay
        .handle(event.method(), event.headers(), event.body().as_ref())
        .instrument(span)
        .await;

    into_lambda_response(&outcome)
}

/// Render a relay outcome as a JSON HTTP response.
pub fn into_lambda_response(outcome: &RelayResponse) -> Result<Response<Body>, Error> {
    let response = Response::builder()
        .status(outcome.status)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::Text(outcome.body_json()))?;
    Ok(response)
}
