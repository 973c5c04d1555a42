/// Fills coordinates into normalized records in place.
///
/// Only `lat`, `lng` and `geocode_confidence` are ever written; `id` and
/// every other field produced by the normalizer pass through untouched.
use dining_core::model::CanonicalRecord;
use tracing::{info, warn};

use crate::cache::GeocodeCache;
use crate::client::AddressLookup;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EnrichReport {
    /// Records that already had coordinates
    pub already_located: usize,
    pub cache_hits: usize,
    pub looked_up: usize,
    /// Lookups that errored or found nothing
    pub failed: usize,
    pub no_address: usize,
}

pub async fn geocode_records(
    records: &mut [CanonicalRecord],
    cache: &mut GeocodeCache,
    lookup: &impl AddressLookup,
) -> EnrichReport {
    let mut report = EnrichReport::default();
    let pending = records.iter().filter(|r| !r.has_coordinates()).count();
    info!(pending, total = records.len(), "geocoding restaurants");

    for (position, record) in records
        .iter_mut()
        .filter(|r| !r.has_coordinates())
        .enumerate()
    {
        let progress = position + 1;
        if record.address.trim().is_empty() {
            warn!(name = %record.name, "no address, skipping");
            report.no_address += 1;
            continue;
        }

        if let Some(entry) = cache.get(&record.address) {
            apply(record, entry.lat, entry.lng, &entry.osm_type);
            report.cache_hits += 1;
            continue;
        }

        report.looked_up += 1;
        match lookup.lookup(&record.address).await {
            Ok(Some(entry)) => {
                apply(record, entry.lat, entry.lng, &entry.osm_type);
                info!(
                    progress,
                    pending,
                    name = %record.name,
                    lat = entry.lat,
                    lng = entry.lng,
                    "geocoded"
                );
                cache.insert(&record.address, entry);
                if let Err(e) = cache.save() {
                    warn!(error = %e, "failed to persist geocode cache");
                }
            }
            Ok(None) => {
                warn!(progress, pending, name = %record.name, address = %record.address, "no geocoding results");
                report.failed += 1;
            }
            Err(e) => {
                warn!(progress, pending, name = %record.name, error = %e, "geocoding failed");
                report.failed += 1;
            }
        }
    }

    report.already_located = records.len() - pending;
    let located = records.iter().filter(|r| r.has_coordinates()).count();
    info!(located, total = records.len(), "geocoding complete");
    report
}

fn apply(record: &mut CanonicalRecord, lat: f64, lng: f64, osm_type: &str) {
    record.lat = Some(lat);
    record.lng = Some(lng);
    record.geocode_confidence = Some(osm_type.to_string()).filter(|s| !s.is_empty());
}
