use anyhow::{anyhow, Error};
use tracing_subscriber::EnvFilter;

#[cfg(test)]
#[path = "telemetry_tests.rs"]
mod telemetry_tests;

/// Log filter used when `RUST_LOG` is not set. Status lines are `info` events,
/// a stricter filter hides them.
const DEFAULT_FILTER: &str = "info";

pub fn init_local_telemetry() -> Result<(), Error> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // Set up console subscriber, status lines go to stdout
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to set up logging: {}", e))?;

    Ok(())
}
