//! Geographic primitives for the map engine.
//!
//! Provides points, visible regions, and the fixed-size grid cells used for
//! marker deduplication, plus the degree-to-meter conversion behind the
//! clustering radius.

mod types;

pub use types::{
    GeoError, GeoPoint, GridCell, Region, EARTH_CIRCUMFERENCE_METERS, MAX_LAT, MAX_LON,
    METERS_PER_DEGREE_AT_EQUATOR, MIN_LAT, MIN_LON,
};

impl Region {
    /// Creates a validated region.
    ///
    /// # Errors
    ///
    /// Returns a [`GeoError`] if the center is out of range or either span is
    /// not a finite positive number.
    pub fn new(
        latitude: f64,
        longitude: f64,
        latitude_delta: f64,
        longitude_delta: f64,
    ) -> Result<Self, GeoError> {
        if !latitude.is_finite() || !(MIN_LAT..=MAX_LAT).contains(&latitude) {
            return Err(GeoError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(MIN_LON..=MAX_LON).contains(&longitude) {
            return Err(GeoError::InvalidLongitude(longitude));
        }
        for delta in [latitude_delta, longitude_delta] {
            if !delta.is_finite() || delta <= 0.0 {
                return Err(GeoError::InvalidDelta(delta));
            }
        }

        Ok(Self {
            latitude,
            longitude,
            latitude_delta,
            longitude_delta,
        })
    }

    /// A square region of `delta` degrees centered on `point`.
    #[inline]
    pub fn around(point: GeoPoint, delta: f64) -> Self {
        Self {
            latitude: point.latitude,
            longitude: point.longitude,
            latitude_delta: delta,
            longitude_delta: delta,
        }
    }

    /// Same span, moved so that `point` is the new center.
    #[inline]
    pub fn recentered(&self, point: GeoPoint) -> Self {
        Self {
            latitude: point.latitude,
            longitude: point.longitude,
            ..*self
        }
    }

    #[inline]
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    /// Checks whether `point` lies within the region grown by `buffer_factor`.
    ///
    /// The bounds extend `delta * (1 + buffer_factor)` from the center on each
    /// axis, so markers just off-screen are kept while panning.
    pub fn contains(&self, point: &GeoPoint, buffer_factor: f64) -> bool {
        let lat_extent = self.latitude_delta * (1.0 + buffer_factor);
        let lng_extent = self.longitude_delta * (1.0 + buffer_factor);

        point.latitude >= self.latitude - lat_extent
            && point.latitude <= self.latitude + lat_extent
            && point.longitude >= self.longitude - lng_extent
            && point.longitude <= self.longitude + lng_extent
    }
}

impl GridCell {
    /// Buckets a point into the grid of `grid_size` degrees.
    #[inline]
    pub fn of(point: &GeoPoint, grid_size: f64) -> Self {
        Self {
            lat_cell: (point.latitude / grid_size).floor() as i64,
            lng_cell: (point.longitude / grid_size).floor() as i64,
        }
    }
}

/// Converts a longitude span to meters measured along the equator.
#[inline]
pub fn longitude_span_meters(longitude_delta: f64) -> f64 {
    longitude_delta * METERS_PER_DEGREE_AT_EQUATOR
}

#[cfg(test)]
mod tests;
