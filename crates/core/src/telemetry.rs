//! Logging setup for native hosts and test binaries

use crate::config::LogConfig;
use anyhow::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber
///
/// `RUST_LOG` wins over the configured level.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed
pub fn init_tracing(config: &LogConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .try_init()?;

    Ok(())
}

/// Install a subscriber with the default configuration
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed
pub fn init_default() -> Result<()> {
    init_tracing(&LogConfig::default())
}
