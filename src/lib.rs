//! ExHentai favorites synchronizer.
//!
//! Scrapes the paginated favorites listing, enriches every discovered gallery
//! through the bulk `gdata` metadata API (25 galleries per request, failed
//! batches retried in bounded rounds), and merges the favorite annotations
//! back onto the metadata in discovery order. The run is fail-closed: unless
//! every batch eventually succeeds, no snapshot is written.

pub mod domain;
pub mod infrastructure;
pub mod sync;
