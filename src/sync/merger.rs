//! Recombines favorite annotations with fetched metadata.

use std::collections::BTreeMap;

use tracing::warn;

use crate::domain::{FavoriteItem, GalleryMetadata};

/// Walk the batch results in ascending offset order, zip each chunk's
/// records with its favorites sub-slice by position, and copy the favorite
/// annotations onto the records.
///
/// The ascending walk preserves original discovery order regardless of
/// which round a batch succeeded in. Records beyond a chunk's item count
/// pass through unannotated; items beyond a chunk's record count are
/// dropped from the output.
pub fn merge_annotations(
    favorites: &[FavoriteItem],
    batch_results: BTreeMap<usize, Vec<GalleryMetadata>>,
    batch_size: usize,
) -> Vec<GalleryMetadata> {
    let mut merged = Vec::with_capacity(favorites.len());

    for (offset, records) in batch_results {
        let end = favorites.len().min(offset.saturating_add(batch_size));
        let chunk_items = favorites.get(offset..end).unwrap_or_default();

        if records.len() != chunk_items.len() {
            warn!(
                "batch at offset {offset} has {} record(s) for {} favorite(s); \
                 annotating the shorter length",
                records.len(),
                chunk_items.len()
            );
        }

        for (index, mut record) in records.into_iter().enumerate() {
            if let Some(item) = chunk_items.get(index) {
                record.annotate(&item.category, &item.added_at);
            }
            merged.push(record);
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn favorite(id: &str, category: &str, added_at: &str) -> FavoriteItem {
        FavoriteItem {
            id: id.to_string(),
            token: format!("tok{id}"),
            category: category.to_string(),
            added_at: added_at.to_string(),
        }
    }

    fn record(gid: u64) -> GalleryMetadata {
        let mut fields = serde_json::Map::new();
        fields.insert("gid".to_string(), gid.into());
        GalleryMetadata {
            fav_category: None,
            fav_time: None,
            fields,
        }
    }

    #[test]
    fn output_preserves_discovery_order() {
        let favorites = vec![
            favorite("1", "Reading", "day 1"),
            favorite("2", "Reading", "day 2"),
            favorite("3", "Later", "day 3"),
        ];

        // Insertion order deliberately reversed; the map orders by offset.
        let mut batch_results = BTreeMap::new();
        batch_results.insert(2, vec![record(3)]);
        batch_results.insert(0, vec![record(1), record(2)]);

        let merged = merge_annotations(&favorites, batch_results, 2);

        let gids: Vec<u64> = merged
            .iter()
            .map(|r| r.fields["gid"].as_u64().unwrap())
            .collect();
        assert_eq!(gids, vec![1, 2, 3]);

        assert_eq!(merged[0].fav_category.as_deref(), Some("Reading"));
        assert_eq!(merged[0].fav_time.as_deref(), Some("day 1"));
        assert_eq!(merged[2].fav_category.as_deref(), Some("Later"));
        assert_eq!(merged[2].fav_time.as_deref(), Some("day 3"));
    }

    #[test]
    fn undersized_record_list_drops_excess_favorites() {
        let favorites = vec![
            favorite("1", "Reading", "day 1"),
            favorite("2", "Reading", "day 2"),
        ];

        let mut batch_results = BTreeMap::new();
        batch_results.insert(0, vec![record(1)]);

        let merged = merge_annotations(&favorites, batch_results, 25);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].fav_time.as_deref(), Some("day 1"));
    }

    #[test]
    fn oversized_record_list_passes_extras_through_unannotated() {
        let favorites = vec![favorite("1", "Reading", "day 1")];

        let mut batch_results = BTreeMap::new();
        batch_results.insert(0, vec![record(1), record(99)]);

        let merged = merge_annotations(&favorites, batch_results, 25);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].fav_category.as_deref(), Some("Reading"));
        assert!(merged[1].fav_category.is_none());
    }

    #[test]
    fn output_length_never_exceeds_total_record_count() {
        let favorites: Vec<_> = (0..7)
            .map(|i| favorite(&i.to_string(), "c", "t"))
            .collect();

        let mut batch_results = BTreeMap::new();
        batch_results.insert(0, vec![record(0), record(1)]);
        batch_results.insert(3, vec![record(3)]);
        batch_results.insert(6, vec![record(6)]);

        let merged = merge_annotations(&favorites, batch_results, 3);
        assert_eq!(merged.len(), 4);
    }

    #[test]
    fn empty_results_merge_to_nothing() {
        let favorites = vec![favorite("1", "c", "t")];
        let merged = merge_annotations(&favorites, BTreeMap::new(), 25);
        assert!(merged.is_empty());
    }
}
