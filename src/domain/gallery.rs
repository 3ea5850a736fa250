//! Gallery metadata records returned by the bulk API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One gallery's metadata as returned by the gdata endpoint.
///
/// The upstream schema is not under our control, so everything it sends is
/// kept verbatim in the open `fields` map. `favCategory` and `favTime` are
/// the two fields this system adds; the merger sets them exactly once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GalleryMetadata {
    /// Favorite category copied from the listing row.
    #[serde(rename = "favCategory", skip_serializing_if = "Option::is_none")]
    pub fav_category: Option<String>,
    /// Favorited-at timestamp copied from the listing row.
    #[serde(rename = "favTime", skip_serializing_if = "Option::is_none")]
    pub fav_time: Option<String>,
    /// Upstream-controlled metadata fields, kept as-is.
    #[serde(flatten)]
    pub fields: serde_json::Map<String, Value>,
}

impl GalleryMetadata {
    /// Copies the favorite annotations onto this record.
    pub fn annotate(&mut self, category: &str, added_at: &str) {
        self.fav_category = Some(category.to_string());
        self.fav_time = Some(added_at.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn upstream_fields_round_trip_through_the_open_map() {
        let record: GalleryMetadata = serde_json::from_value(json!({
            "gid": 123_456,
            "title": "Sample Gallery",
            "tags": ["language:chinese"],
        }))
        .unwrap();

        assert_eq!(record.fields["gid"], 123_456);
        assert_eq!(record.fields["title"], "Sample Gallery");
        assert!(record.fav_category.is_none());

        let encoded = serde_json::to_value(&record).unwrap();
        assert_eq!(encoded["title"], "Sample Gallery");
        assert!(encoded.get("favCategory").is_none());
    }

    #[test]
    fn annotations_serialize_under_their_wire_names() {
        let mut record = GalleryMetadata::default();
        record.annotate("Reading", "2024-01-02 10:30");

        let encoded = serde_json::to_value(&record).unwrap();
        assert_eq!(encoded["favCategory"], "Reading");
        assert_eq!(encoded["favTime"], "2024-01-02 10:30");
    }
}
