/// Groups raw records that describe the same physical restaurant.
///
/// Grouping is exact on the normalized keys, never fuzzy: two names that
/// differ by one word stay separate.
///
/// Address-less records attach to the one addressed group sharing their
/// name. When several addresses exist for that name, the address-less
/// records get their own name-only group instead of picking one.
use std::collections::HashMap;

use tracing::{debug, warn};

use crate::keys::MatchKey;
use crate::model::RawRecord;

/// Records judged to be one restaurant, in source order.
#[derive(Debug, Clone)]
pub struct MatchGroup {
    /// Shared key; `address` is empty for name-only groups
    pub key: MatchKey,
    /// Input position of the earliest member
    pub first_seen: usize,
    pub members: Vec<RawRecord>,
}

/// Result of matching: every input record lands in exactly one of
/// `groups` or `unmatched`.
#[derive(Debug, Default)]
pub struct Partition {
    /// Ordered by `first_seen`
    pub groups: Vec<MatchGroup>,
    /// Records with no usable name, excluded from matching
    pub unmatched: Vec<RawRecord>,
}

pub fn partition(records: Vec<RawRecord>) -> Partition {
    let keys: Vec<MatchKey> = records.iter().map(MatchKey::of).collect();

    let mut slot_keys: Vec<MatchKey> = Vec::new();
    let mut slot_of: HashMap<MatchKey, usize> = HashMap::new();
    let mut addressed_by_name: HashMap<String, Vec<usize>> = HashMap::new();
    let mut assignment: Vec<Option<usize>> = vec![None; records.len()];

    // Addressed records first, so every address known for a name is
    // visible before address-less records are placed.
    for (index, key) in keys.iter().enumerate() {
        if key.name.is_empty() || key.address.is_empty() {
            continue;
        }
        let slot = match slot_of.get(key) {
            Some(&slot) => slot,
            None => {
                let slot = slot_keys.len();
                slot_keys.push(key.clone());
                slot_of.insert(key.clone(), slot);
                addressed_by_name
                    .entry(key.name.clone())
                    .or_default()
                    .push(slot);
                slot
            }
        };
        assignment[index] = Some(slot);
    }

    for (index, key) in keys.iter().enumerate() {
        if key.name.is_empty() || !key.address.is_empty() {
            continue;
        }
        let slot = match addressed_by_name.get(&key.name).map(Vec::as_slice) {
            Some([only]) => *only,
            candidates => {
                if let Some(candidates) = candidates {
                    debug!(
                        name = %key.name,
                        addresses = candidates.len(),
                        "address-less record matches several addresses, keeping it separate"
                    );
                }
                *slot_of.entry(key.clone()).or_insert_with(|| {
                    slot_keys.push(key.clone());
                    slot_keys.len() - 1
                })
            }
        };
        assignment[index] = Some(slot);
    }

    let mut groups: Vec<MatchGroup> = slot_keys
        .into_iter()
        .map(|key| MatchGroup {
            key,
            first_seen: usize::MAX,
            members: Vec::new(),
        })
        .collect();
    let mut unmatched = Vec::new();

    for (index, (record, slot)) in records.into_iter().zip(assignment).enumerate() {
        match slot {
            Some(slot) => {
                let group = &mut groups[slot];
                group.first_seen = group.first_seen.min(index);
                group.members.push(record);
            }
            None => {
                warn!(
                    index,
                    address = %record.address,
                    source_url = %record.source_url,
                    "record has no usable name, skipping"
                );
                unmatched.push(record);
            }
        }
    }

    groups.sort_by_key(|group| group.first_seen);

    Partition { groups, unmatched }
}
