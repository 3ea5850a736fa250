//! Driver-level pipeline tests with a scripted batch fetcher.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use exfav_sync::domain::{FavoriteItem, GalleryMetadata};
use exfav_sync::sync::{
    BatchFetch, BatchOutcome, FavoriteChunk, RetryPolicy, SyncError, enrich_favorites,
};

/// Fails each scripted offset a fixed number of times, then succeeds with
/// one record per chunk item.
struct ScriptedFetcher {
    failures: Mutex<HashMap<usize, u32>>,
    calls: Mutex<usize>,
}

impl ScriptedFetcher {
    fn new(failures: &[(usize, u32)]) -> Self {
        Self {
            failures: Mutex::new(failures.iter().copied().collect()),
            calls: Mutex::new(0),
        }
    }

    fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl BatchFetch for ScriptedFetcher {
    async fn fetch_chunk(&self, chunk: &FavoriteChunk) -> BatchOutcome {
        *self.calls.lock().unwrap() += 1;

        let mut failures = self.failures.lock().unwrap();
        let remaining = failures.entry(chunk.offset).or_insert(0);
        if *remaining > 0 {
            *remaining -= 1;
            return BatchOutcome {
                offset: chunk.offset,
                success: false,
                records: Vec::new(),
            };
        }

        let records = chunk
            .items
            .iter()
            .map(|item| {
                let mut fields = serde_json::Map::new();
                fields.insert("gid".to_string(), item.id.clone().into());
                GalleryMetadata {
                    fav_category: None,
                    fav_time: None,
                    fields,
                }
            })
            .collect();

        BatchOutcome {
            offset: chunk.offset,
            success: true,
            records,
        }
    }
}

fn favorites(count: usize) -> Vec<FavoriteItem> {
    (0..count)
        .map(|i| FavoriteItem {
            id: i.to_string(),
            token: format!("tok{i}"),
            category: format!("cat{}", i % 3),
            added_at: format!("day {i}"),
        })
        .collect()
}

fn policy() -> RetryPolicy {
    RetryPolicy {
        max_retries: 5,
        retry_delay: Duration::ZERO,
    }
}

#[tokio::test]
async fn empty_favorites_fail_before_any_fetch() {
    let fetcher = ScriptedFetcher::new(&[]);

    let result = enrich_favorites(&[], &fetcher, &policy()).await;

    assert!(matches!(result, Err(SyncError::EmptyFavorites)));
    assert_eq!(fetcher.calls(), 0);
}

#[tokio::test]
async fn clean_run_returns_annotated_records_in_discovery_order() {
    let items = favorites(30);
    let fetcher = ScriptedFetcher::new(&[]);

    let records = enrich_favorites(&items, &fetcher, &policy()).await.unwrap();

    assert_eq!(records.len(), 30);
    for (index, record) in records.iter().enumerate() {
        assert_eq!(record.fields["gid"], index.to_string());
        assert_eq!(record.fav_category.as_deref(), Some(items[index].category.as_str()));
        assert_eq!(record.fav_time.as_deref(), Some(items[index].added_at.as_str()));
    }
    // 30 favorites at batch size 25 -> exactly two fetches.
    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test]
async fn transient_batch_failure_is_invisible_in_the_output() {
    let items = favorites(30);
    let fetcher = ScriptedFetcher::new(&[(0, 1)]);

    let records = enrich_favorites(&items, &fetcher, &policy()).await.unwrap();

    assert_eq!(records.len(), 30);
    let gids: Vec<String> = records
        .iter()
        .map(|record| record.fields["gid"].as_str().unwrap().to_string())
        .collect();
    let expected: Vec<String> = (0..30).map(|i| i.to_string()).collect();
    assert_eq!(gids, expected);

    // 2 initial fetches + 1 retry of the first chunk.
    assert_eq!(fetcher.calls(), 3);
}

#[tokio::test]
async fn exhausted_retries_abort_the_sync() {
    let items = favorites(30);
    let fetcher = ScriptedFetcher::new(&[(25, u32::MAX)]);

    let result = enrich_favorites(&items, &fetcher, &policy()).await;

    match result {
        Err(SyncError::IncompleteData {
            failed,
            rounds,
            batch_numbers,
        }) => {
            assert_eq!(failed, 1);
            assert_eq!(rounds, 5);
            assert_eq!(batch_numbers, vec![2]);
        }
        other => panic!("expected IncompleteData, got {other:?}"),
    }

    // 2 initial fetches + 5 retry rounds over the failing chunk.
    assert_eq!(fetcher.calls(), 7);
}
