//! Logging initialization.
//!
//! Console output is always on; a rolling file under `logs/` can be enabled
//! through configuration. RUST_LOG overrides the configured level.

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use super::config::LoggingConfig;

/// Initialize the global tracing subscriber.
///
/// Returns the file writer guard when file output is enabled; the caller
/// must keep it alive for the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.clone()));

    let console = fmt::layer().with_target(false);

    if config.file_output {
        let appender = tracing_appender::rolling::daily("logs", "exfav-sync.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let file = fmt::layer().with_ansi(false).with_writer(writer);

        tracing_subscriber::registry()
            .with(filter)
            .with(console)
            .with(file)
            .init();
        Ok(Some(guard))
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(console)
            .init();
        Ok(None)
    }
}
