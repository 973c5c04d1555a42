use serde::{Deserialize, Serialize};

/// A restaurant mention as emitted by the extractor for one source page.
///
/// Only `name` is required; an object without it is malformed and dropped
/// by the collector. Unknown fields (coordinates, rating text) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Free-text name, casing and whitespace not normalized
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub neighborhood: String,
    #[serde(default)]
    pub cuisine: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub restaurant_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Review or guide page this record was extracted from
    #[serde(default)]
    pub source_url: String,
}

/// One deduplicated restaurant in the normalized dataset.
///
/// Produced once per match group and never mutated by this crate. The
/// geocoder later fills `lat`, `lng` and `geocode_confidence` in place;
/// every other field, `id` included, is owned by the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    /// Stable identifier derived from the normalized name and address
    pub id: String,
    pub name: String,
    /// URL-friendly form of `name`, e.g. "tartine-bakery"
    pub slug: String,
    pub address: String,
    pub neighborhood: String,
    pub cuisine: String,
    pub tags: Vec<String>,
    pub restaurant_url: Option<String>,
    pub image_url: Option<String>,
    /// Every contributing source page, in first-appearance order
    pub source_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    /// OSM object type of the geocoding hit, e.g. "node" or "way"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geocode_confidence: Option<String>,
}

impl CanonicalRecord {
    pub fn has_coordinates(&self) -> bool {
        self.lat.is_some() && self.lng.is_some()
    }
}
