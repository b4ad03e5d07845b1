//! Splits a raw search response into venues and clusters.
//!
//! The service returns an unordered list where each entry is either a real
//! cluster or a singleton wrapping one venue. Singletons are promoted to
//! plain venues so they never render as cluster markers. Entries that fail
//! validation are dropped without error: one bad record must not blank the
//! map.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::model::{Cluster, RawEntry, RawVenue, Venue};

/// Normalized result of one search response.
///
/// Array order carries no meaning; identity is by `id`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciled {
    pub venues: Vec<Venue>,
    pub clusters: Vec<Cluster>,
}

impl Reconciled {
    pub fn is_empty(&self) -> bool {
        self.venues.is_empty() && self.clusters.is_empty()
    }

    pub fn venue(&self, id: &str) -> Option<&Venue> {
        self.venues.iter().find(|v| v.id == id)
    }

    pub fn cluster(&self, id: &str) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.id == id)
    }
}

/// Reconciles raw entries into venues and clusters.
///
/// - `count == 1` with an embedded venue whose coordinates validate: the venue
///   is promoted (a venue id seen twice is kept once).
/// - `count > 1` with numeric center coordinates: kept as a cluster. Missing
///   ids are synthesized from the center. Any id already taken within the
///   response, provided or synthesized, gets a `-2`, `-3`, ... suffix.
/// - Anything else is discarded.
pub fn reconcile<I>(entries: I) -> Reconciled
where
    I: IntoIterator<Item = RawEntry>,
{
    let mut result = Reconciled::default();
    let mut seen_venues: HashSet<String> = HashSet::new();
    let mut cluster_ids: HashSet<String> = HashSet::new();
    let mut dropped = 0usize;

    for entry in entries {
        let count = entry.count.unwrap_or(0);

        if count == 1 {
            match entry.venue.and_then(RawVenue::into_venue) {
                Some(venue) => {
                    if seen_venues.insert(venue.id.clone()) {
                        result.venues.push(venue);
                    } else {
                        trace!(venue_id = %venue.id, "Duplicate singleton venue skipped");
                    }
                }
                None => {
                    dropped += 1;
                    trace!("Singleton entry without a usable venue dropped");
                }
            }
            continue;
        }

        let center = entry.center.as_ref().and_then(|c| c.point());
        match (count > 1, center) {
            (true, Some(center)) => {
                let base = entry
                    .id_string()
                    .unwrap_or_else(|| Cluster::synthesized_id(&center));
                let id = claim_cluster_id(base, &mut cluster_ids);
                result.clusters.push(Cluster { id, count, center });
            }
            _ => {
                dropped += 1;
                trace!(count, "Malformed cluster entry dropped");
            }
        }
    }

    debug!(
        venues = result.venues.len(),
        clusters = result.clusters.len(),
        dropped,
        "Reconciled search response"
    );

    result
}

/// Returns `base`, or the first free `base-N` (N >= 2), and marks it taken.
fn claim_cluster_id(base: String, taken: &mut HashSet<String>) -> String {
    if taken.insert(base.clone()) {
        return base;
    }
    let id = (2u32..)
        .map(|n| format!("{}-{}", base, n))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_default();
    trace!(base = %base, id = %id, "Cluster id collision disambiguated");
    taken.insert(id.clone());
    id
}
