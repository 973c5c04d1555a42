/// Stable restaurant identifiers.
///
/// An ID is a pure function of the match key:
/// `<slug of normalized name>-<first 10 hex chars of sha256(name \x1f address)>`,
/// e.g. `tartine-bakery-3b9e0c41a2`. No counters and no previous output are
/// consulted, so an unchanged restaurant keeps its ID across runs.
use std::collections::HashSet;

use sha2::{Digest, Sha256};
use tracing::warn;

use crate::keys::MatchKey;
use crate::merger::MergedRecord;
use crate::model::CanonicalRecord;

const MAX_SLUG_LEN: usize = 48;
const HASH_LEN: usize = 10;
const FALLBACK_SLUG: &str = "restaurant";

/// Lowercase ASCII alphanumerics joined by single hyphens.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// Derive the base ID for a match key, before collision handling.
pub fn derive_id(key: &MatchKey) -> String {
    let mut slug = slugify(&key.name);
    if slug.len() > MAX_SLUG_LEN {
        slug.truncate(MAX_SLUG_LEN);
        slug.truncate(slug.trim_end_matches('-').len());
    }
    if slug.is_empty() {
        slug = FALLBACK_SLUG.to_string();
    }

    let mut hasher = Sha256::new();
    hasher.update(key.name.as_bytes());
    hasher.update(b"\x1f");
    hasher.update(key.address.as_bytes());
    let hash = format!("{:x}", hasher.finalize());

    format!("{slug}-{}", &hash[..HASH_LEN])
}

/// Hands out IDs in output order, suffixing `-2`, `-3`, ... on collision.
#[derive(Debug, Default)]
pub struct IdAssigner {
    taken: HashSet<String>,
    collisions: usize,
}

impl IdAssigner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self, merged: MergedRecord) -> CanonicalRecord {
        let base = derive_id(&merged.key);
        let id = if self.taken.insert(base.clone()) {
            base
        } else {
            let mut n = 2;
            let id = loop {
                let candidate = format!("{base}-{n}");
                if self.taken.insert(candidate.clone()) {
                    break candidate;
                }
                n += 1;
            };
            warn!(base = %base, id = %id, name = %merged.name, "id collision, suffixed");
            self.collisions += 1;
            id
        };

        CanonicalRecord {
            id,
            slug: slugify(&merged.name),
            name: merged.name,
            address: merged.address,
            neighborhood: merged.neighborhood,
            cuisine: merged.cuisine,
            tags: merged.tags,
            restaurant_url: merged.restaurant_url,
            image_url: merged.image_url,
            source_urls: merged.source_urls,
            lat: None,
            lng: None,
            geocode_confidence: None,
        }
    }

    /// Number of records that needed a disambiguating suffix.
    pub fn collisions(&self) -> usize {
        self.collisions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str, address: &str) -> MatchKey {
        MatchKey {
            name: name.to_string(),
            address: address.to_string(),
        }
    }

    fn merged(name: &str, address: &str) -> MergedRecord {
        MergedRecord {
            key: key(&crate::keys::normalize_name(name), &crate::keys::normalize_address(address)),
            name: name.to_string(),
            address: address.to_string(),
            neighborhood: String::new(),
            cuisine: String::new(),
            tags: Vec::new(),
            restaurant_url: None,
            image_url: None,
            source_urls: Vec::new(),
        }
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Tartine Bakery"), "tartine-bakery");
        assert_eq!(slugify("  Swan's -- Oyster Depot!  "), "swan-s-oyster-depot");
        assert_eq!(slugify("Zuni Café"), "zuni-caf");
        assert_eq!(slugify("金"), "");
    }

    #[test]
    fn test_derive_id_shape() {
        let id = derive_id(&key("tartine bakery", "600 guerrero st"));
        let (slug, hash) = id.rsplit_once('-').unwrap();
        assert_eq!(slug, "tartine-bakery");
        assert_eq!(hash.len(), HASH_LEN);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_derive_id_is_pure() {
        let a = derive_id(&key("tartine bakery", "600 guerrero st"));
        let b = derive_id(&key("tartine bakery", "600 guerrero st"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_derive_id_disambiguates_addresses() {
        let a = derive_id(&key("nopalito", "306 broderick st"));
        let b = derive_id(&key("nopalito", "1224 9th ave"));
        let c = derive_id(&key("nopalito", ""));
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with("nopalito-") && b.starts_with("nopalito-"));
    }

    #[test]
    fn test_derive_id_long_and_unsluggable_names() {
        let long = "a ".repeat(60);
        let id = derive_id(&key(long.trim(), ""));
        let (slug, _) = id.rsplit_once('-').unwrap();
        assert!(slug.len() <= MAX_SLUG_LEN);
        assert!(!slug.ends_with('-'));

        let id = derive_id(&key("金", ""));
        assert!(id.starts_with("restaurant-"));
    }

    #[test]
    fn test_assign_builds_canonical_record() {
        let mut assigner = IdAssigner::new();
        let record = assigner.assign(merged("Tartine Bakery", "600 Guerrero St"));
        assert_eq!(record.id, derive_id(&key("tartine bakery", "600 guerrero st")));
        assert_eq!(record.slug, "tartine-bakery");
        assert_eq!(record.name, "Tartine Bakery");
        assert!(!record.has_coordinates());
        assert_eq!(assigner.collisions(), 0);
    }

    #[test]
    fn test_collisions_get_numeric_suffix() {
        let mut assigner = IdAssigner::new();
        let first = assigner.assign(merged("Nopa", ""));
        let second = assigner.assign(merged("Nopa", ""));
        let third = assigner.assign(merged("NOPA", ""));

        assert_eq!(second.id, format!("{}-2", first.id));
        assert_eq!(third.id, format!("{}-3", first.id));
        assert_eq!(assigner.collisions(), 2);
    }
}
