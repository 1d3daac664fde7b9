//! Boot: logging init and config load.

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::conf::ViewerConfig;

/// Initialise the tracing / logging subsystem.
///
/// Diagnostics go to stderr; stdout is reserved for record output.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "viewer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load and validate configuration.
pub fn boot() -> Result<ViewerConfig, Box<dyn std::error::Error>> {
    info!("Starting clefview v0.0.1");

    let config = ViewerConfig::load()?;
    config.validate()?;
    info!(
        batch_size = config.batch_size,
        poll_interval_ms = config.poll_interval_ms,
        "Loaded configuration"
    );

    Ok(config)
}
