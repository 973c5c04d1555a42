use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::AppError;

const NORMALIZED_FILE: &str = "restaurants.normalized.json";
const OUTPUT_FILE: &str = "restaurants.json";
const CACHE_FILE: &str = ".geocode_cache.json";
const IMAGES_DIR: &str = "images";
const DEFAULT_IMAGE_URL_PREFIX: &str = "/images";
const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";
const DEFAULT_USER_AGENT: &str =
    "SfDiningMap/1.0 (personal project; geocoding restaurant addresses for a map)";

/// Enrichment configuration (geocoding and image download) loaded explicitly
/// from environment variables.
///
/// Nominatim's usage policy asks for at most one request per second and an
/// identifying User-Agent, hence the defaults below.
#[derive(Debug, Clone)]
pub struct Config {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub cache_path: PathBuf,
    pub nominatim_url: String,
    pub user_agent: String,
    /// Minimum spacing between outgoing requests.
    pub min_interval: Duration,
    pub timeout: Duration,
    /// Copy the normalized file through without any lookups.
    pub skip: bool,
    /// Where downloaded images are stored as `<id>.jpg`.
    pub images_dir: PathBuf,
    /// Public URL prefix written into `image_url` for local images.
    pub image_url_prefix: String,
    pub image_min_interval: Duration,
    /// Keep remote image URLs and download nothing.
    pub skip_images: bool,
}

impl Config {
    /// Required:
    /// - `DINING_DATA_DIR`
    ///
    /// Optional:
    /// - `DINING_NORMALIZED_PATH` (default: `$DINING_DATA_DIR/restaurants.normalized.json`)
    /// - `DINING_OUTPUT_PATH` (default: `$DINING_DATA_DIR/restaurants.json`)
    /// - `GEOCODE_CACHE_PATH` (default: `$DINING_DATA_DIR/.geocode_cache.json`)
    /// - `NOMINATIM_URL`, `GEOCODE_USER_AGENT`
    /// - `GEOCODE_MIN_INTERVAL_MS` (default: 1100)
    /// - `GEOCODE_TIMEOUT_SECS` (default: 15)
    /// - `GEOCODE_SKIP` ("1"/"true" to skip lookups)
    /// - `DINING_IMAGES_DIR` (default: `$DINING_DATA_DIR/images`)
    /// - `IMAGE_URL_PREFIX` (default: `/images`)
    /// - `IMAGE_MIN_INTERVAL_MS` (default: 500)
    /// - `IMAGES_SKIP` ("1"/"true" to skip downloads)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let data_dir = lookup("DINING_DATA_DIR").ok_or_else(|| {
            AppError::Config("DINING_DATA_DIR environment variable is required".to_string())
        })?;
        let data_dir = Path::new(&data_dir);
        let path_or = |key: &str, file: &str| {
            lookup(key)
                .map(PathBuf::from)
                .unwrap_or_else(|| data_dir.join(file))
        };

        let input_path = path_or("DINING_NORMALIZED_PATH", NORMALIZED_FILE);
        if !input_path.exists() {
            return Err(AppError::Config(format!(
                "normalized restaurants file not found at {}",
                input_path.display()
            )));
        }

        let millis_or = |key: &str, default: u64| {
            lookup(key)
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or_else(|| Duration::from_millis(default))
        };
        let flag = |key: &str| {
            lookup(key)
                .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false)
        };

        let timeout = lookup("GEOCODE_TIMEOUT_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(15));

        Ok(Self {
            output_path: path_or("DINING_OUTPUT_PATH", OUTPUT_FILE),
            cache_path: path_or("GEOCODE_CACHE_PATH", CACHE_FILE),
            input_path,
            nominatim_url: lookup("NOMINATIM_URL")
                .unwrap_or_else(|| DEFAULT_NOMINATIM_URL.to_string()),
            user_agent: lookup("GEOCODE_USER_AGENT")
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            min_interval: millis_or("GEOCODE_MIN_INTERVAL_MS", 1_100),
            timeout,
            skip: flag("GEOCODE_SKIP"),
            images_dir: path_or("DINING_IMAGES_DIR", IMAGES_DIR),
            image_url_prefix: lookup("IMAGE_URL_PREFIX")
                .map(|prefix| prefix.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_IMAGE_URL_PREFIX.to_string()),
            image_min_interval: millis_or("IMAGE_MIN_INTERVAL_MS", 500),
            skip_images: flag("IMAGES_SKIP"),
        })
    }
}
