//! Logging initialization
//!
//! Console output always; optional rolling JSON file output when a log
//! directory is configured. The returned guard must be held for the process
//! lifetime or buffered file output is lost.

use std::io;
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Initialize the global tracing subscriber from configuration
pub fn init(config: &LoggingConfig) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_ansi(true)
        .with_writer(io::stdout);

    if let Some(ref dir) = config.log_dir {
        let file_appender = rolling::daily(dir, "gantry-relay.log");
        let (writer, guard) = non_blocking(file_appender);

        if config.json_format {
            let file_layer = fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .json()
                .with_writer(writer);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .with(file_layer)
                .try_init()?;
        } else {
            let file_layer = fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(writer);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .with(file_layer)
                .try_init()?;
        }

        tracing::info!(level = %config.level, log_dir = %dir.display(), "logging initialized");
        Ok(Some(guard))
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .try_init()?;
        tracing::info!(level = %config.level, "logging initialized");
        Ok(None)
    }
}
