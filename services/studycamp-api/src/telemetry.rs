//! Logging initialization
//!
//! `RUST_LOG` takes precedence over the configured level. Output is either
//! human-readable (`pretty`) or one JSON object per line (`json`).

use studycamp_core::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Error returned when a global subscriber is already installed.
pub type InitError = Box<dyn std::error::Error + Send + Sync + 'static>;

fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Install the global tracing subscriber.
pub fn init_logging(config: &LoggingConfig) -> Result<(), InitError> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true);

    if config.format == "json" {
        builder.json().try_init()?;
    } else {
        builder.try_init()?;
    }

    tracing::info!(
        "Logging initialized (level={}, format={})",
        config.level,
        config.format
    );
    Ok(())
}
