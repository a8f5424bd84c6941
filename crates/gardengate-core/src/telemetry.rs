use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing with an env filter and the fmt layer.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` is used.
/// Calling it twice returns an error instead of panicking.
pub fn init_telemetry(default_filter: &str) -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    tracing::debug!(filter = default_filter, "Tracing initialized");
    Ok(())
}

/// Default filter for Garden Gate binaries.
pub const DEFAULT_LOG_FILTER: &str = "gardengate=debug";
