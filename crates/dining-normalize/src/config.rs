use std::path::{Path, PathBuf};

use crate::error::AppError;

const RAW_FILE: &str = "restaurants.raw.json";
const NORMALIZED_FILE: &str = "restaurants.normalized.json";

/// Normalizer configuration loaded explicitly from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Raw extractor output to read.
    pub raw_path: PathBuf,
    /// Where the normalized dataset is written.
    pub normalized_path: PathBuf,
}

impl Config {
    /// Required:
    /// - `DINING_DATA_DIR`: pipeline data directory
    ///
    /// Optional:
    /// - `DINING_RAW_PATH` (default: `$DINING_DATA_DIR/restaurants.raw.json`)
    /// - `DINING_NORMALIZED_PATH` (default: `$DINING_DATA_DIR/restaurants.normalized.json`)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let data_dir = lookup("DINING_DATA_DIR").ok_or_else(|| {
            AppError::Config("DINING_DATA_DIR environment variable is required".to_string())
        })?;
        let data_dir = Path::new(&data_dir);

        let raw_path = lookup("DINING_RAW_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join(RAW_FILE));
        if !raw_path.exists() {
            return Err(AppError::Config(format!(
                "raw restaurants file not found at {}",
                raw_path.display()
            )));
        }

        let normalized_path = lookup("DINING_NORMALIZED_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join(NORMALIZED_FILE));

        Ok(Self {
            raw_path,
            normalized_path,
        })
    }
}
