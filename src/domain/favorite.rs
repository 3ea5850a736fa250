//! Favorite entries discovered on the paginated listing.

use serde::{Deserialize, Serialize};

/// A single favorited gallery as scraped from one listing row.
///
/// `id` and `token` together identify the remote gallery. Duplicates across
/// pages pass through as-is; the pipeline preserves discovery order, it does
/// not deduplicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteItem {
    /// Decimal gallery id, as it appears in the gallery URL.
    pub id: String,
    /// Gallery token from the gallery URL.
    pub token: String,
    /// Favorite category label, `"Unknown"` when the row has none.
    pub category: String,
    /// Favorited-at timestamp text, `"Unknown"` when the row has none.
    pub added_at: String,
}
