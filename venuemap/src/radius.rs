//! Clustering radius estimation from the visible map span.
//!
//! The search service clusters venues within the radius it is given. The
//! radius starts at half the visible width in meters and shrinks at tight
//! zoom levels so clusters split into individual pins sooner.
//!
//! ```text
//! longitude_delta < 0.01  → base × 0.5
//! longitude_delta < 0.05  → base × 0.7
//! otherwise               → base × 1.0
//! ```

use crate::geo::{longitude_span_meters, Region};

/// Zoom tiers for the clustering radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusConfig {
    /// Spans narrower than this use `tight_factor` (default: 0.01°).
    pub tight_threshold: f64,
    /// Multiplier for the tightest zoom tier (default: 0.5).
    pub tight_factor: f64,
    /// Spans narrower than this use `medium_factor` (default: 0.05°).
    pub medium_threshold: f64,
    /// Multiplier for the medium zoom tier (default: 0.7).
    pub medium_factor: f64,
}

impl Default for RadiusConfig {
    fn default() -> Self {
        Self {
            tight_threshold: 0.01,
            tight_factor: 0.5,
            medium_threshold: 0.05,
            medium_factor: 0.7,
        }
    }
}

/// Pure mapping from viewport to clustering radius in meters.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClusterRadiusEstimator {
    config: RadiusConfig,
}

impl ClusterRadiusEstimator {
    pub fn new(config: RadiusConfig) -> Self {
        Self { config }
    }

    /// Radius in meters for the given viewport. Same input, same output.
    pub fn estimate(&self, viewport: &Region) -> f64 {
        let delta = viewport.longitude_delta;
        let base = longitude_span_meters(delta) / 2.0;

        let factor = if delta < self.config.tight_threshold {
            self.config.tight_factor
        } else if delta < self.config.medium_threshold {
            self.config.medium_factor
        } else {
            1.0
        };

        base * factor
    }
}

/// Radius with the default zoom tiers.
#[inline]
pub fn estimate_radius(viewport: &Region) -> f64 {
    ClusterRadiusEstimator::default().estimate(viewport)
}
