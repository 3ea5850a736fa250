//! Bounded retry rounds over failed batches.

use std::collections::BTreeMap;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

use super::SyncError;
use super::batch::{BatchFetch, FavoriteChunk};
use crate::domain::GalleryMetadata;

/// Retry tuning for the batch fetch stage.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retry rounds after the initial pass.
    pub max_retries: u32,
    /// Fixed delay before every retry fetch.
    pub retry_delay: Duration,
}

/// Drives the batch fetch stage: one initial pass over every chunk, then up
/// to `max_retries` rounds over whatever is still failing.
pub struct RetryCoordinator<'a, F: BatchFetch> {
    fetcher: &'a F,
    policy: RetryPolicy,
}

impl<'a, F: BatchFetch> RetryCoordinator<'a, F> {
    pub fn new(fetcher: &'a F, policy: RetryPolicy) -> Self {
        Self { fetcher, policy }
    }

    /// Fetch every chunk, retrying failures in bounded rounds.
    ///
    /// Returns the offset-keyed record map once every chunk has succeeded,
    /// or [`SyncError::IncompleteData`] when failures survive the last
    /// round. Each offset holds exactly one entry; a retried success
    /// overwrites, never appends.
    pub async fn run(
        &self,
        chunks: &[FavoriteChunk],
    ) -> Result<BTreeMap<usize, Vec<GalleryMetadata>>, SyncError> {
        let mut results = BTreeMap::new();
        let mut failed: Vec<&FavoriteChunk> = Vec::new();

        info!("fetching metadata in {} batch(es)", chunks.len());

        for chunk in chunks {
            let outcome = self.fetcher.fetch_chunk(chunk).await;
            if outcome.success {
                results.insert(outcome.offset, outcome.records);
            } else {
                failed.push(chunk);
            }
        }

        if !failed.is_empty() {
            warn!(
                "initial pass left {} batch(es) failing, retrying...",
                failed.len()
            );
        }

        for round in 1..=self.policy.max_retries {
            if failed.is_empty() {
                break;
            }
            info!("retry round {round}: {} failed batch(es)", failed.len());

            let mut still_failed = Vec::new();
            for chunk in failed {
                sleep(self.policy.retry_delay).await;
                let outcome = self.fetcher.fetch_chunk(chunk).await;
                if outcome.success {
                    results.insert(outcome.offset, outcome.records);
                } else {
                    still_failed.push(chunk);
                }
            }
            failed = still_failed;

            if failed.is_empty() {
                info!("retry round {round} cleared all failed batches");
            } else {
                warn!(
                    "retry round {round} finished with {} batch(es) still failing",
                    failed.len()
                );
            }
        }

        if failed.is_empty() {
            Ok(results)
        } else {
            Err(SyncError::IncompleteData {
                failed: failed.len(),
                rounds: self.policy.max_retries,
                batch_numbers: failed.iter().map(|chunk| chunk.number).collect(),
            })
        }
    }
}
