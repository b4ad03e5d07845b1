//! Geographic type definitions

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Valid latitude range
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Equatorial circumference of the Earth in meters.
pub const EARTH_CIRCUMFERENCE_METERS: f64 = 40_075_000.0;

/// Meters covered by one degree of longitude at the equator.
pub const METERS_PER_DEGREE_AT_EQUATOR: f64 = EARTH_CIRCUMFERENCE_METERS / 360.0;

/// A geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Builds a point from a GeoJSON-ordered `[longitude, latitude]` pair.
    #[inline]
    pub fn from_lng_lat(pair: [f64; 2]) -> Self {
        Self::new(pair[1], pair[0])
    }

    /// Returns true if both components are finite numbers.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// Visible map region: a center plus the span in degrees.
///
/// Field names serialize in the camelCase form map views emit
/// (`latitudeDelta`, `longitudeDelta`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    /// Center latitude in degrees
    pub latitude: f64,
    /// Center longitude in degrees
    pub longitude: f64,
    /// Visible north-south span in degrees
    pub latitude_delta: f64,
    /// Visible east-west span in degrees
    pub longitude_delta: f64,
}

/// Spatial bucket used to detect visually overlapping markers.
///
/// Only meaningful for a single `grid_size`; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    /// `floor(latitude / grid_size)`
    pub lat_cell: i64,
    /// `floor(longitude / grid_size)`
    pub lng_cell: i64,
}

/// Errors that can occur when building a region.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    /// Latitude is outside valid range (-90.0 to 90.0) or not finite
    #[error("Invalid latitude: {0} (must be between {min} and {max})", min = MIN_LAT, max = MAX_LAT)]
    InvalidLatitude(f64),
    /// Longitude is outside valid range (-180.0 to 180.0) or not finite
    #[error("Invalid longitude: {0} (must be between {min} and {max})", min = MIN_LON, max = MAX_LON)]
    InvalidLongitude(f64),
    /// Span must be a finite, strictly positive number of degrees
    #[error("Invalid region span: {0} (must be > 0)")]
    InvalidDelta(f64),
}
