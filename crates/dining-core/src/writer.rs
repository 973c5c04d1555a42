/// Persistence for the normalized dataset.
///
/// The file is a pretty-printed JSON array of `CanonicalRecord` in group
/// order. The geocoder reads it back with `read_canonical_file` and rewrites
/// it with coordinates added.
use std::path::Path;

use tracing::info;

use crate::error::CoreError;
use crate::model::CanonicalRecord;

/// Render records exactly as they are written to disk.
pub fn to_json(records: &[CanonicalRecord]) -> Result<String, CoreError> {
    let mut json = serde_json::to_string_pretty(records)?;
    json.push('\n');
    Ok(json)
}

pub fn write_canonical_file(path: &Path, records: &[CanonicalRecord]) -> Result<(), CoreError> {
    let json = to_json(records)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| CoreError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, json).map_err(|source| CoreError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), records = records.len(), "wrote restaurants");
    Ok(())
}

pub fn read_canonical_file(path: &Path) -> Result<Vec<CanonicalRecord>, CoreError> {
    let content = std::fs::read_to_string(path).map_err(|source| CoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CanonicalRecord {
        CanonicalRecord {
            id: "tartine-bakery-0123456789".to_string(),
            name: "Tartine Bakery".to_string(),
            slug: "tartine-bakery".to_string(),
            address: "600 Guerrero St".to_string(),
            neighborhood: "Mission".to_string(),
            cuisine: "Bakery".to_string(),
            tags: vec!["bakery".to_string(), "coffee".to_string()],
            restaurant_url: None,
            image_url: Some("https://img/tartine.jpg".to_string()),
            source_urls: vec!["/a".to_string(), "/b".to_string()],
            lat: None,
            lng: None,
            geocode_confidence: None,
        }
    }

    #[test]
    fn test_normalized_output_has_no_coordinate_fields() {
        let json = to_json(&[sample()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let object = value[0].as_object().unwrap();

        for field in [
            "id",
            "name",
            "address",
            "neighborhood",
            "cuisine",
            "tags",
            "restaurant_url",
            "image_url",
            "source_urls",
        ] {
            assert!(object.contains_key(field), "missing {field}");
        }
        assert!(!object.contains_key("lat"));
        assert!(!object.contains_key("lng"));
        assert!(!object.contains_key("geocode_confidence"));
        assert!(object["restaurant_url"].is_null());
        assert!(json.ends_with("]\n"));
    }

    #[test]
    fn test_empty_output_is_empty_array() {
        assert_eq!(to_json(&[]).unwrap(), "[]\n");
    }

    #[test]
    fn test_write_then_read_preserves_geocoded_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("restaurants.json");

        let mut record = sample();
        record.lat = Some(37.7614);
        record.lng = Some(-122.4241);
        record.geocode_confidence = Some("way".to_string());

        write_canonical_file(&path, std::slice::from_ref(&record)).unwrap();
        let loaded = read_canonical_file(&path).unwrap();
        assert_eq!(loaded, vec![record]);
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_canonical_file(Path::new("/nonexistent/restaurants.json")).unwrap_err();
        assert!(matches!(err, CoreError::Read { .. }));
    }
}
