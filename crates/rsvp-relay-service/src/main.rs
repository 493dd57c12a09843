//! Wedding RSVP relay HTTP microservice.
//!
//! # Configuration
//!
//! - `RESEND_API_KEY`, `RSVP_TO_EMAIL` - provider credentials (see `rsvp_relay_lib::config`)
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text
//! - `SERVICE_PORT` - HTTP port (default: 8080)

use std::env;
use std::net::SocketAddr;

use tracing::{error, info};

use rsvp_relay_lib::RsvpRelay;
use rsvp_relay_service::{LogFormat, SERVICE_NAME, build_router, init_logging};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(LogFormat::from_env());

    let port: u16 = env::var("SERVICE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let relay = RsvpRelay::from_env().map_err(|e| {
        error!(error = %e, "failed to load relay configuration");
        e
    })?;

    info!(
        service = SERVICE_NAME,
        port = port,
        configured = relay.is_configured(),
        "starting RSVP relay service"
    );

    let app = build_router(relay);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(addr = %addr, "listening on");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
