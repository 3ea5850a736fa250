//! The favorites sync pipeline: pagination, chunked metadata fetch with
//! bounded retries, and order-preserving merge.

pub mod batch;
pub mod engine;
pub mod merger;
pub mod paginator;
pub mod retry;

pub use batch::{BatchFetch, BatchOutcome, FavoriteChunk, GdataBatchFetcher, chunk_favorites};
pub use engine::{SyncEngine, enrich_favorites};
pub use merger::merge_annotations;
pub use paginator::FavoritesPaginator;
pub use retry::{RetryCoordinator, RetryPolicy};

use thiserror::Error;

use crate::infrastructure::parsing::ParsingError;

/// Fatal sync failures. Any of these aborts the run before output exists.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The favorites listing yielded nothing. Treated as an authentication
    /// failure rather than an account without favorites.
    #[error("favorites list is empty - session cookies may be invalid or expired")]
    EmptyFavorites,

    /// One or more batches kept failing after every retry round.
    #[error(
        "{failed} batch(es) still failing after {rounds} retry round(s) \
         (batches: {batch_numbers:?}); aborting to keep the previous snapshot intact"
    )]
    IncompleteData {
        failed: usize,
        rounds: u32,
        batch_numbers: Vec<usize>,
    },

    /// Parser construction failed.
    #[error("parser initialization failed: {0}")]
    Parser(#[from] ParsingError),
}
