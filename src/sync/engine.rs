//! Sync driver: orchestrates pagination, batched fetch, and merge.

use anyhow::Result;
use tracing::info;

use super::SyncError;
use super::batch::{BatchFetch, GdataBatchFetcher, chunk_favorites};
use super::merger::merge_annotations;
use super::paginator::FavoritesPaginator;
use super::retry::{RetryCoordinator, RetryPolicy};
use crate::domain::constants::site;
use crate::domain::{FavoriteItem, GalleryMetadata};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::{HttpClient, HttpClientConfig};

/// Drives one full sync run. Owns the authenticated HTTP session for its
/// duration.
pub struct SyncEngine {
    client: HttpClient,
    base_url: String,
    policy: RetryPolicy,
}

impl SyncEngine {
    /// Build the engine and its authenticated HTTP session.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let session = [
            (site::COOKIE_MEMBER_ID.to_string(), config.auth.member_id.clone()),
            (site::COOKIE_PASS_HASH.to_string(), config.auth.pass_hash.clone()),
            (site::COOKIE_IGNEOUS.to_string(), config.auth.igneous.clone()),
        ];
        let client =
            HttpClient::with_session(HttpClientConfig::default(), &config.base_url, &session)?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            policy: RetryPolicy {
                max_retries: config.retry.max_retries,
                retry_delay: config.retry.retry_delay(),
            },
        })
    }

    /// Run the full pipeline.
    ///
    /// Fail-closed: any completeness failure aborts before output exists,
    /// so the caller only persists on `Ok`.
    pub async fn sync(&self) -> Result<Vec<GalleryMetadata>, SyncError> {
        let paginator = FavoritesPaginator::new(&self.client)?;
        let favorites = paginator.collect_all(&self.base_url).await;

        let fetcher = GdataBatchFetcher::new(&self.client);
        enrich_favorites(&favorites, &fetcher, &self.policy).await
    }
}

/// Chunk the favorites, fetch their metadata with retries, and merge the
/// annotations back in discovery order.
///
/// Split out from [`SyncEngine::sync`] so the batch stage runs against any
/// [`BatchFetch`] implementation.
pub async fn enrich_favorites<F: BatchFetch>(
    favorites: &[FavoriteItem],
    fetcher: &F,
    policy: &RetryPolicy,
) -> Result<Vec<GalleryMetadata>, SyncError> {
    if favorites.is_empty() {
        return Err(SyncError::EmptyFavorites);
    }
    info!("collected {} favorite(s)", favorites.len());

    let chunks = chunk_favorites(favorites, site::GDATA_BATCH_SIZE);
    let coordinator = RetryCoordinator::new(fetcher, policy.clone());
    let batch_results = coordinator.run(&chunks).await?;

    let merged = merge_annotations(favorites, batch_results, site::GDATA_BATCH_SIZE);
    info!("merged {} metadata record(s) in discovery order", merged.len());
    Ok(merged)
}
