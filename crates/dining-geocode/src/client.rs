/// Nominatim (OpenStreetMap) search client.
///
/// Free and keyless, but the usage policy requires an identifying
/// User-Agent and at most one request per second. Requests go out one at a
/// time through a `Pacer`. There are no retries: a failed lookup leaves the
/// record without coordinates until the next run.
use serde::Deserialize;
use tracing::debug;

use crate::cache::GeocodeEntry;
use crate::config::Config;
use crate::error::AppError;
use crate::rate_limit::Pacer;

/// Resolves a street address to coordinates.
pub trait AddressLookup {
    /// `Ok(None)` means the service answered but found nothing.
    async fn lookup(&self, address: &str) -> Result<Option<GeocodeEntry>, AppError>;
}

pub struct NominatimClient {
    http: reqwest::Client,
    url: String,
    pacer: Pacer,
}

#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    osm_type: String,
    #[serde(default)]
    importance: Option<f64>,
}

impl NominatimClient {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            http,
            url: config.nominatim_url.clone(),
            pacer: Pacer::new(config.min_interval),
        })
    }
}

impl AddressLookup for NominatimClient {
    async fn lookup(&self, address: &str) -> Result<Option<GeocodeEntry>, AppError> {
        self.pacer.wait().await;
        debug!(address, "querying nominatim");

        let places: Vec<Place> = self
            .http
            .get(&self.url)
            .query(&[
                ("q", address),
                ("format", "json"),
                ("limit", "1"),
                ("countrycodes", "us"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        first_entry(address, places)
    }
}

fn first_entry(address: &str, places: Vec<Place>) -> Result<Option<GeocodeEntry>, AppError> {
    let Some(place) = places.into_iter().next() else {
        return Ok(None);
    };
    let invalid = |message: String| AppError::InvalidResponse {
        address: address.to_string(),
        message,
    };
    let lat = place
        .lat
        .parse::<f64>()
        .map_err(|e| invalid(format!("lat {:?}: {e}", place.lat)))?;
    let lng = place
        .lon
        .parse::<f64>()
        .map_err(|e| invalid(format!("lon {:?}: {e}", place.lon)))?;

    Ok(Some(GeocodeEntry {
        lat,
        lng,
        display_name: place.display_name,
        osm_type: place.osm_type,
        importance: place.importance.unwrap_or(0.0),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn places(json: &str) -> Vec<Place> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_first_entry_parses_nominatim_strings() {
        let json = r#"[{
            "place_id": 1,
            "lat": "37.7614",
            "lon": "-122.4241",
            "display_name": "600, Guerrero Street, Mission District, San Francisco",
            "osm_type": "way",
            "importance": 0.31
        }]"#;
        let entry = first_entry("600 Guerrero St", places(json)).unwrap().unwrap();
        assert_eq!(entry.lat, 37.7614);
        assert_eq!(entry.lng, -122.4241);
        assert_eq!(entry.osm_type, "way");
        assert_eq!(entry.importance, 0.31);
    }

    #[test]
    fn test_first_entry_empty_result() {
        assert!(first_entry("nowhere", places("[]")).unwrap().is_none());
    }

    #[test]
    fn test_first_entry_missing_optional_fields() {
        let json = r#"[{"lat": "1.5", "lon": "2.5", "importance": null}]"#;
        let entry = first_entry("x", places(json)).unwrap().unwrap();
        assert_eq!(entry.display_name, "");
        assert_eq!(entry.importance, 0.0);
    }

    #[test]
    fn test_first_entry_bad_coordinates() {
        let json = r#"[{"lat": "north", "lon": "2.5"}]"#;
        let err = first_entry("x", places(json)).unwrap_err();
        assert!(matches!(err, AppError::InvalidResponse { .. }));
    }
}
