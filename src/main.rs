//! Binary entry point: load config, initialize logging, run the sync, and
//! persist the snapshot. Exits non-zero on any failure so schedulers can
//! alert on broken runs.

use std::process::ExitCode;

use anyhow::Result;
use tracing::{error, info};

use exfav_sync::infrastructure::config::AppConfig;
use exfav_sync::infrastructure::logging::init_logging;
use exfav_sync::infrastructure::snapshot::SnapshotStore;
use exfav_sync::sync::SyncEngine;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = match init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("failed to initialize logging: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    match run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("sync failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &AppConfig) -> Result<()> {
    info!("starting favorites sync from {}", config.base_url);

    let engine = SyncEngine::new(config)?;
    let records = engine.sync().await?;

    let store = SnapshotStore::new(
        config.output.output_path.clone(),
        config.output.backup_dir.clone(),
        config.output.keep_count,
        config.output.prefix.clone(),
    );
    store.persist(&records).await?;

    info!(
        "sync finished: {} record(s) written to {}",
        records.len(),
        config.output.output_path.display()
    );
    Ok(())
}
