//! Logging initialization.
//!
//! Console logging through `tracing-subscriber` with an environment
//! filter. Library code only emits `tracing` events; binaries and tests
//! decide whether and how to subscribe.

use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Initialize console logging with the given default filter directive.
///
/// `RUST_LOG` overrides the default. Returns an error if a global
/// subscriber is already installed.
pub fn init_logging(default_filter: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    Registry::default()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init()?;

    Ok(())
}
