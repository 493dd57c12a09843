//! Log output for the service.
//!
//! JSON lines by default; `LOG_FORMAT=text` (or `pretty`) switches to compact
//! human-readable output for local runs. `RUST_LOG` filters as usual and
//! defaults to `info`. Events emitted while serving a request carry the fields
//! of its [`crate::middleware::RequestSpan`].

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Text,
}

impl LogFormat {
    /// Unknown names fall back to JSON so a typo never silences structured logs.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Self::Text,
            _ => Self::Json,
        }
    }

    pub fn from_env() -> Self {
        std::env::var(LOG_FORMAT_ENV)
            .map(|name| Self::parse(&name))
            .unwrap_or_default()
    }
}

/// Install the global subscriber. Call once at startup.
pub fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Text => registry.with(fmt::layer().compact()).init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false),
            )
            .init(),
    }
}
