//! Logging initialization for dronefleet binaries.
//!
//! The output format comes from the service configuration: line-oriented
//! output for development, JSON when the logs feed an aggregator. The
//! level filter comes from `RUST_LOG`, defaulting to `info`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber for a service binary.
///
/// ```no_run
/// let config = dronefleet_core::Config::from_env();
/// dronefleet_core::logging::init(config.logging.json);
/// tracing::info!("fleet-api started");
/// ```
pub fn init(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json().with_target(true)).init();
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }
}
