//! Snapshot persistence with rotating backups.
//!
//! The previous output is copied into the backup directory before every
//! overwrite; only the newest `keep_count` backups survive rotation. The
//! caller only invokes [`SnapshotStore::persist`] after a fully successful
//! sync, so a failed run leaves the previous snapshot untouched.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use tokio::fs;
use tracing::info;

use crate::domain::GalleryMetadata;

/// Writes the snapshot JSON and rotates timestamped backups of it.
pub struct SnapshotStore {
    output_path: PathBuf,
    backup_dir: PathBuf,
    keep_count: usize,
    prefix: String,
}

impl SnapshotStore {
    pub fn new(
        output_path: PathBuf,
        backup_dir: PathBuf,
        keep_count: usize,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            output_path,
            backup_dir,
            keep_count,
            prefix: prefix.into(),
        }
    }

    /// Back up the current snapshot, prune old backups, then overwrite the
    /// snapshot with `records` as pretty-printed JSON.
    pub async fn persist(&self, records: &[GalleryMetadata]) -> Result<()> {
        self.backup_current().await?;
        self.prune_backups().await?;

        if let Some(parent) = self.output_path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
        }

        let json = serde_json::to_vec_pretty(records).context("Failed to encode snapshot")?;
        fs::write(&self.output_path, json)
            .await
            .with_context(|| format!("Failed to write snapshot to {}", self.output_path.display()))?;

        info!(
            "wrote {} record(s) to {}",
            records.len(),
            self.output_path.display()
        );
        Ok(())
    }

    async fn backup_current(&self) -> Result<()> {
        if !fs::try_exists(&self.output_path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::create_dir_all(&self.backup_dir)
            .await
            .with_context(|| format!("Failed to create backup directory {}", self.backup_dir.display()))?;

        let timestamp = Local::now().format("%Y%m%d-%H%M%S%.3f");
        let backup_path = self
            .backup_dir
            .join(format!("{}_{timestamp}.json", self.prefix));

        fs::copy(&self.output_path, &backup_path)
            .await
            .with_context(|| format!("Failed to back up snapshot to {}", backup_path.display()))?;

        info!("backed up previous snapshot to {}", backup_path.display());
        Ok(())
    }

    /// Delete all but the newest `keep_count` backups, by modification time.
    async fn prune_backups(&self) -> Result<()> {
        if !fs::try_exists(&self.backup_dir).await.unwrap_or(false) {
            return Ok(());
        }

        let mut backups = Vec::new();
        let mut entries = fs::read_dir(&self.backup_dir)
            .await
            .with_context(|| format!("Failed to read backup directory {}", self.backup_dir.display()))?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .context("Failed to read backup directory entry")?
        {
            let path = entry.path();
            if !self.is_backup_file(&path) {
                continue;
            }
            if let Ok(metadata) = entry.metadata().await {
                if let Ok(modified) = metadata.modified() {
                    backups.push((modified, path));
                }
            }
        }

        backups.sort_by(|a, b| b.0.cmp(&a.0));
        for (_, path) in backups.into_iter().skip(self.keep_count) {
            fs::remove_file(&path)
                .await
                .with_context(|| format!("Failed to delete old backup {}", path.display()))?;
        }

        Ok(())
    }

    fn is_backup_file(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| {
                name.starts_with(&format!("{}_", self.prefix)) && name.ends_with(".json")
            })
    }
}
