/// File-backed geocode cache.
///
/// Keys are `normalize_address(address)`, so spelling variants of one
/// address ("600 Guerrero Street" / "600 guerrero st.") share an entry.
/// A missing or unreadable cache file degrades to an empty cache; callers
/// fall through to a live lookup.
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use dining_core::keys::normalize_address;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::AppError;

/// One resolved address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeEntry {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub display_name: String,
    /// OSM object type ("node", "way", "relation")
    #[serde(default)]
    pub osm_type: String,
    #[serde(default)]
    pub importance: f64,
}

pub struct GeocodeCache {
    path: PathBuf,
    entries: BTreeMap<String, GeocodeEntry>,
}

impl GeocodeCache {
    pub fn load(path: &Path) -> Self {
        let entries = match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content)
                .inspect_err(|e| warn!(error = %e, path = %path.display(), "geocode cache unreadable, starting empty"))
                .unwrap_or_default(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!(error = %e, path = %path.display(), "failed to read geocode cache, starting empty");
                BTreeMap::new()
            }
        };
        info!(entries = entries.len(), "loaded geocode cache");
        Self {
            path: path.to_path_buf(),
            entries,
        }
    }

    pub fn get(&self, address: &str) -> Option<&GeocodeEntry> {
        self.entries.get(&normalize_address(address))
    }

    /// Store an entry; addresses that normalize to nothing are ignored.
    pub fn insert(&mut self, address: &str, entry: GeocodeEntry) {
        let key = normalize_address(address);
        if !key.is_empty() {
            self.entries.insert(key, entry);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn save(&self) -> Result<(), AppError> {
        let cache_err = |message: String| AppError::Cache {
            path: self.path.display().to_string(),
            message,
        };
        let json = serde_json::to_string_pretty(&self.entries).map_err(|e| cache_err(e.to_string()))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| cache_err(e.to_string()))?;
        }
        std::fs::write(&self.path, json).map_err(|e| cache_err(e.to_string()))
    }
}
