//! Marker descriptors handed to the map surface.
//!
//! [`MarkerLayer`] turns the rendered venues and clusters into descriptors
//! with stable keys, keeps one [`MarkerRenderGate`] per live marker, and
//! drops gates for markers that disappear. Descriptors are rebuilt from
//! stored state so the host can re-read them when a gate closes without a
//! new search result.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::geo::GeoPoint;
use crate::model::{Cluster, Venue};
use crate::render_gate::{MarkerRenderGate, RenderGateConfig};
use crate::stagger::StaggerCounter;

/// What a marker stands for.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarkerKind {
    Venue { venue_id: String },
    Cluster { cluster_id: String, count: u64, size: u32 },
}

/// Everything the map view needs to place and draw one marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerDescriptor {
    /// Stable render key: `venue-<id>` or `cluster-<id>-<count>`.
    pub key: String,
    #[serde(flatten)]
    pub kind: MarkerKind,
    pub coordinate: GeoPoint,
    pub selected: bool,
    /// Re-measure flag from the marker's render gate.
    pub tracks_view_changes: bool,
    #[serde(serialize_with = "serialize_millis")]
    pub entry_delay: Duration,
}

pub fn venue_marker_key(venue_id: &str) -> String {
    format!("venue-{}", venue_id)
}

pub fn cluster_marker_key(cluster: &Cluster) -> String {
    format!("cluster-{}-{}", cluster.id, cluster.count)
}

/// Cluster bubble diameter in points, by member count.
pub fn cluster_marker_size(count: u64) -> u32 {
    match count {
        0..=9 => 40,
        10..=49 => 50,
        50..=99 => 60,
        _ => 70,
    }
}

#[derive(Debug)]
struct MarkerEntry {
    descriptor: MarkerDescriptor,
    gate: MarkerRenderGate,
}

/// Live marker set with per-marker render gates.
#[derive(Debug)]
pub struct MarkerLayer {
    gate_config: RenderGateConfig,
    stagger: StaggerCounter,
    entries: HashMap<String, MarkerEntry>,
    order: Vec<String>,
}

impl MarkerLayer {
    pub fn new(gate_config: RenderGateConfig, stagger: StaggerCounter) -> Self {
        Self {
            gate_config,
            stagger,
            entries: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Replaces the marker set. Clusters are listed before venues.
    ///
    /// Markers whose key survives keep their gate (reopened only if their
    /// selection changed); new keys get a fresh, open gate and the next
    /// stagger delay of this batch.
    pub fn sync(
        &mut self,
        venues: &[&Venue],
        clusters: &[Cluster],
        selected_id: Option<&str>,
        now: Instant,
    ) {
        self.stagger.reset();
        let mut order = Vec::with_capacity(venues.len() + clusters.len());

        for cluster in clusters {
            let descriptor = MarkerDescriptor {
                key: cluster_marker_key(cluster),
                kind: MarkerKind::Cluster {
                    cluster_id: cluster.id.clone(),
                    count: cluster.count,
                    size: cluster_marker_size(cluster.count),
                },
                coordinate: cluster.center,
                selected: false,
                tracks_view_changes: false,
                entry_delay: Duration::ZERO,
            };
            order.push(self.upsert(descriptor, now));
        }

        for venue in venues {
            let descriptor = MarkerDescriptor {
                key: venue_marker_key(&venue.id),
                kind: MarkerKind::Venue {
                    venue_id: venue.id.clone(),
                },
                coordinate: venue.location,
                selected: selected_id == Some(venue.id.as_str()),
                tracks_view_changes: false,
                entry_delay: Duration::ZERO,
            };
            order.push(self.upsert(descriptor, now));
        }

        let live: HashSet<&String> = order.iter().collect();
        self.entries.retain(|key, _| live.contains(key));
        self.order = order;
    }

    /// Updates only the selection flags, reopening gates that changed.
    pub fn select(&mut self, selected_id: Option<&str>, now: Instant) {
        for entry in self.entries.values_mut() {
            if let MarkerKind::Venue { venue_id } = &entry.descriptor.kind {
                let selected = selected_id == Some(venue_id.as_str());
                entry.descriptor.selected = selected;
                entry.gate.set_emphasis(selected, now);
            }
        }
    }

    /// Current descriptors with re-measure flags evaluated at `now`.
    pub fn descriptors(&self, now: Instant) -> Vec<MarkerDescriptor> {
        self.order
            .iter()
            .filter_map(|key| self.entries.get(key))
            .map(|entry| MarkerDescriptor {
                tracks_view_changes: entry.gate.allows_remeasure(now),
                ..entry.descriptor.clone()
            })
            .collect()
    }

    /// Earliest moment an open gate closes, if any is open.
    pub fn next_gate_close(&self, now: Instant) -> Option<Instant> {
        self.entries
            .values()
            .filter_map(|entry| entry.gate.closes_at(now))
            .min()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn upsert(&mut self, mut descriptor: MarkerDescriptor, now: Instant) -> String {
        let key = descriptor.key.clone();
        match self.entries.get_mut(&key) {
            Some(entry) => {
                entry.gate.set_emphasis(descriptor.selected, now);
                descriptor.entry_delay = entry.descriptor.entry_delay;
                entry.descriptor = descriptor;
            }
            None => {
                descriptor.entry_delay = self.stagger.next_delay();
                let gate = MarkerRenderGate::appeared(&self.gate_config, descriptor.selected, now);
                self.entries
                    .insert(key.clone(), MarkerEntry { descriptor, gate });
            }
        }
        key
    }
}

impl Default for MarkerLayer {
    fn default() -> Self {
        Self::new(RenderGateConfig::default(), StaggerCounter::default())
    }
}

fn serialize_millis<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(duration.as_millis() as u64)
}
