/// Collapses a match group into one merged record.
///
/// Field policy, applied to members in source order:
/// - `name`: most frequent trimmed spelling, ties to the longest, then first seen
/// - scalar fields and URLs: first non-empty trimmed value
/// - `tags`, `source_urls`: de-duplicated union in first-appearance order
use std::collections::{HashMap, HashSet};

use crate::keys::MatchKey;
use crate::matcher::MatchGroup;

/// A merged restaurant awaiting its stable ID.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRecord {
    pub key: MatchKey,
    pub name: String,
    pub address: String,
    pub neighborhood: String,
    pub cuisine: String,
    pub tags: Vec<String>,
    pub restaurant_url: Option<String>,
    pub image_url: Option<String>,
    pub source_urls: Vec<String>,
}

pub fn merge(group: &MatchGroup) -> MergedRecord {
    let members = &group.members;

    MergedRecord {
        key: group.key.clone(),
        name: pick_name(members.iter().map(|r| r.name.as_str())),
        address: first_non_empty(members.iter().map(|r| r.address.as_str())).unwrap_or_default(),
        neighborhood: first_non_empty(members.iter().map(|r| r.neighborhood.as_str()))
            .unwrap_or_default(),
        cuisine: first_non_empty(members.iter().map(|r| r.cuisine.as_str())).unwrap_or_default(),
        tags: ordered_union(members.iter().flat_map(|r| r.tags.iter().map(String::as_str))),
        restaurant_url: first_non_empty(members.iter().filter_map(|r| r.restaurant_url.as_deref())),
        image_url: first_non_empty(members.iter().filter_map(|r| r.image_url.as_deref())),
        source_urls: ordered_union(members.iter().map(|r| r.source_url.as_str())),
    }
}

/// Most frequent trimmed name; ties go to the longer string, then the
/// earlier one.
fn pick_name<'a>(names: impl Iterator<Item = &'a str>) -> String {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for name in names.map(str::trim).filter(|n| !n.is_empty()) {
        let count = counts.entry(name).or_insert(0);
        if *count == 0 {
            order.push(name);
        }
        *count += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for name in order {
        let count = counts[name];
        let better = match best {
            None => true,
            Some((current, current_count)) => {
                count > current_count
                    || (count == current_count
                        && name.chars().count() > current.chars().count())
            }
        };
        if better {
            best = Some((name, count));
        }
    }
    best.map(|(name, _)| name.to_string()).unwrap_or_default()
}

fn first_non_empty<'a>(mut values: impl Iterator<Item = &'a str>) -> Option<String> {
    values
        .find_map(|v| Some(v.trim()).filter(|v| !v.is_empty()))
        .map(str::to_string)
}

fn ordered_union<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .map(str::trim)
        .filter(|v| !v.is_empty() && seen.insert(*v))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawRecord;

    fn group(members: Vec<RawRecord>) -> MatchGroup {
        MatchGroup {
            key: MatchKey::of(&members[0]),
            first_seen: 0,
            members,
        }
    }

    fn named(name: &str) -> RawRecord {
        RawRecord {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_merge_tartine_example() {
        let merged = merge(&group(vec![
            RawRecord {
                name: "Tartine Bakery".to_string(),
                address: "600 Guerrero St".to_string(),
                tags: vec!["bakery".to_string()],
                source_url: "/a".to_string(),
                ..Default::default()
            },
            RawRecord {
                name: "tartine bakery".to_string(),
                address: "600 guerrero st".to_string(),
                tags: vec!["coffee".to_string()],
                source_url: "/b".to_string(),
                ..Default::default()
            },
        ]));

        assert_eq!(merged.tags, vec!["bakery", "coffee"]);
        assert_eq!(merged.source_urls, vec!["/a", "/b"]);
        assert_eq!(merged.address, "600 Guerrero St");
        // One vote each; equal length, so the first spelling wins
        assert_eq!(merged.name, "Tartine Bakery");
    }

    #[test]
    fn test_name_majority_wins() {
        let merged = merge(&group(vec![
            named("nopa"),
            named("Nopa"),
            named(" Nopa "),
        ]));
        assert_eq!(merged.name, "Nopa");
    }

    #[test]
    fn test_name_tie_prefers_longest() {
        let merged = merge(&group(vec![named("Zuni"), named("Zuni Cafe (SF)")]));
        assert_eq!(merged.name, "Zuni Cafe (SF)");
    }

    #[test]
    fn test_name_is_order_independent_without_ties() {
        let a = merge(&group(vec![named("Nopa"), named("NOPA"), named("Nopa")]));
        let b = merge(&group(vec![named("NOPA"), named("Nopa"), named("Nopa")]));
        assert_eq!(a.name, b.name);
    }

    #[test]
    fn test_first_non_empty_fields() {
        let merged = merge(&group(vec![
            RawRecord {
                name: "Nopa".to_string(),
                neighborhood: "  ".to_string(),
                restaurant_url: Some("".to_string()),
                ..Default::default()
            },
            RawRecord {
                name: "Nopa".to_string(),
                address: "560 Divisadero St".to_string(),
                neighborhood: "NoPa".to_string(),
                cuisine: "Californian".to_string(),
                restaurant_url: Some("https://nopasf.com".to_string()),
                image_url: Some("https://img/1.jpg".to_string()),
                ..Default::default()
            },
            RawRecord {
                name: "Nopa".to_string(),
                address: "560 Divisadero Street".to_string(),
                neighborhood: "Western Addition".to_string(),
                image_url: Some("https://img/2.jpg".to_string()),
                ..Default::default()
            },
        ]));
        assert_eq!(merged.address, "560 Divisadero St");
        assert_eq!(merged.neighborhood, "NoPa");
        assert_eq!(merged.cuisine, "Californian");
        assert_eq!(merged.restaurant_url.as_deref(), Some("https://nopasf.com"));
        assert_eq!(merged.image_url.as_deref(), Some("https://img/1.jpg"));
    }

    #[test]
    fn test_missing_values_stay_empty() {
        let merged = merge(&group(vec![named("Nopa")]));
        assert_eq!(merged.address, "");
        assert_eq!(merged.restaurant_url, None);
        assert!(merged.tags.is_empty());
        assert!(merged.source_urls.is_empty());
    }

    #[test]
    fn test_tags_and_sources_deduplicate() {
        let merged = merge(&group(vec![
            RawRecord {
                name: "Nopa".to_string(),
                tags: vec!["date night".to_string(), " brunch".to_string()],
                source_url: "/guide/brunch".to_string(),
                ..Default::default()
            },
            RawRecord {
                name: "Nopa".to_string(),
                tags: vec!["brunch".to_string(), "".to_string(), "late night".to_string()],
                source_url: "/guide/brunch".to_string(),
                ..Default::default()
            },
        ]));
        assert_eq!(merged.tags, vec!["date night", "brunch", "late night"]);
        assert_eq!(merged.source_urls, vec!["/guide/brunch"]);
    }
}
