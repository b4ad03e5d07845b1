//! Grid-based deduplication of overlapping venue markers.
//!
//! At wide zoom levels several venues can land on the same few pixels. The
//! deduplicator keeps one representative per fixed-size grid cell. It is a
//! rendering filter only: the reconciled venue list is left untouched for
//! every other consumer (bottom sheet, selection lookups).

use std::collections::HashSet;

use tracing::trace;

use crate::geo::{GridCell, Region};
use crate::model::Venue;

/// Default grid cell size in degrees (about 50m at the equator).
pub const DEFAULT_GRID_SIZE: f64 = 0.0005;

/// Below this longitude span dedup is skipped entirely.
pub const DEFAULT_MIN_LONGITUDE_DELTA: f64 = 0.005;

/// Configuration for [`GridDeduplicator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DedupeConfig {
    /// Cell size in degrees.
    pub grid_size: f64,
    /// Zoom gate: viewports narrower than this are not deduplicated.
    pub min_longitude_delta: f64,
}

impl Default for DedupeConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            min_longitude_delta: DEFAULT_MIN_LONGITUDE_DELTA,
        }
    }
}

/// Collapses venues sharing a grid cell onto a single representative.
#[derive(Debug, Clone, Default)]
pub struct GridDeduplicator {
    config: DedupeConfig,
}

impl GridDeduplicator {
    pub fn new(config: DedupeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DedupeConfig {
        &self.config
    }

    /// Whether dedup applies at this viewport's zoom level.
    #[inline]
    pub fn is_active(&self, viewport: &Region) -> bool {
        viewport.longitude_delta >= self.config.min_longitude_delta
    }

    /// Returns the venues to render.
    ///
    /// When zoomed in past the gate the input is returned unchanged, in its
    /// original order. Otherwise venues are ordered by name (id breaks ties)
    /// and the first claimant of each cell wins, so repeated calls on the same
    /// input always keep the same representative. Venues without a finite
    /// location are dropped.
    pub fn dedupe<'a, V>(&self, venues: &'a [V], viewport: &Region) -> Vec<&'a Venue>
    where
        V: AsRef<Venue>,
    {
        if !self.is_active(viewport) {
            return venues.iter().map(|v| v.as_ref()).collect();
        }

        let mut sorted: Vec<&Venue> = venues
            .iter()
            .map(|v| v.as_ref())
            .filter(|v| v.location.is_finite())
            .collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

        let mut occupied: HashSet<GridCell> = HashSet::with_capacity(sorted.len());
        sorted.retain(|venue| {
            let claimed = occupied.insert(GridCell::of(&venue.location, self.config.grid_size));
            if !claimed {
                trace!(venue_id = %venue.id, "Venue hidden by occupied grid cell");
            }
            claimed
        });

        sorted
    }
}

impl AsRef<Venue> for Venue {
    fn as_ref(&self) -> &Venue {
        self
    }
}
