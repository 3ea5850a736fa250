//! Chunking and bulk metadata fetch against the gdata API.

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{error, info, warn};

use crate::domain::constants::site;
use crate::domain::{FavoriteItem, GalleryMetadata};
use crate::infrastructure::HttpClient;

/// An ordered slice of the favorites sequence, at most
/// [`site::GDATA_BATCH_SIZE`] items.
#[derive(Debug, Clone)]
pub struct FavoriteChunk {
    /// Starting index in the full favorites sequence. The stable identity
    /// used to reassemble order after retries.
    pub offset: usize,
    /// 1-based batch number, for log messages.
    pub number: usize,
    pub items: Vec<FavoriteItem>,
}

/// Result of one fetch attempt for one chunk.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub offset: usize,
    pub success: bool,
    pub records: Vec<GalleryMetadata>,
}

impl BatchOutcome {
    fn failure(offset: usize) -> Self {
        Self {
            offset,
            success: false,
            records: Vec::new(),
        }
    }
}

/// Split the favorites sequence into fetch chunks of at most `batch_size`.
pub fn chunk_favorites(favorites: &[FavoriteItem], batch_size: usize) -> Vec<FavoriteChunk> {
    favorites
        .chunks(batch_size)
        .enumerate()
        .map(|(index, items)| FavoriteChunk {
            offset: index * batch_size,
            number: index + 1,
            items: items.to_vec(),
        })
        .collect()
}

/// One fetch attempt for one chunk. Failure is a value, not an error path;
/// the retry coordinator branches on it.
#[async_trait]
pub trait BatchFetch {
    async fn fetch_chunk(&self, chunk: &FavoriteChunk) -> BatchOutcome;
}

/// Fetcher for the gdata bulk metadata endpoint.
pub struct GdataBatchFetcher<'a> {
    client: &'a HttpClient,
    api_url: String,
}

impl<'a> GdataBatchFetcher<'a> {
    pub fn new(client: &'a HttpClient) -> Self {
        Self {
            client,
            api_url: site::API_URL.to_string(),
        }
    }

    /// Endpoint override, for tests pointed at a local server.
    pub fn with_api_url(client: &'a HttpClient, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
        }
    }

    fn build_payload(chunk: &FavoriteChunk) -> Option<Value> {
        let mut gidlist = Vec::with_capacity(chunk.items.len());
        for item in &chunk.items {
            let gid: i64 = match item.id.parse() {
                Ok(gid) => gid,
                Err(_) => {
                    warn!(
                        "batch {}: unusable gallery id {:?}",
                        chunk.number, item.id
                    );
                    return None;
                }
            };
            gidlist.push(json!([gid, item.token]));
        }

        Some(json!({
            "method": "gdata",
            "gidlist": gidlist,
            "namespace": site::GDATA_NAMESPACE,
        }))
    }

    fn parse_records(response: Value) -> Option<Vec<GalleryMetadata>> {
        response
            .get("gmetadata")?
            .as_array()?
            .iter()
            .map(|record| serde_json::from_value(record.clone()).ok())
            .collect()
    }
}

#[async_trait]
impl BatchFetch for GdataBatchFetcher<'_> {
    async fn fetch_chunk(&self, chunk: &FavoriteChunk) -> BatchOutcome {
        info!(
            "requesting batch {} ({} item(s))",
            chunk.number,
            chunk.items.len()
        );

        let Some(payload) = Self::build_payload(chunk) else {
            return BatchOutcome::failure(chunk.offset);
        };

        let response = match self.client.post_json(&self.api_url, &payload).await {
            Ok(response) => response,
            Err(e) => {
                error!("batch {} request failed: {e:#}", chunk.number);
                return BatchOutcome::failure(chunk.offset);
            }
        };

        let Some(records) = Self::parse_records(response) else {
            error!("batch {}: malformed gdata response", chunk.number);
            return BatchOutcome::failure(chunk.offset);
        };

        if records.len() != chunk.items.len() {
            warn!(
                "batch {} returned {} record(s) for {} item(s)",
                chunk.number,
                records.len(),
                chunk.items.len()
            );
        }

        info!(
            "batch {} succeeded with {} record(s)",
            chunk.number,
            records.len()
        );
        BatchOutcome {
            offset: chunk.offset,
            success: true,
            records,
        }
    }
}
