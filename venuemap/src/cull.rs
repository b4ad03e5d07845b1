//! Viewport culling for venue markers.

use crate::geo::Region;
use crate::model::Venue;

/// Default fraction of the span kept beyond each edge of the viewport.
pub const DEFAULT_BUFFER_FACTOR: f64 = 0.5;

/// Default cap on venue markers handed to the map view.
pub const DEFAULT_MAX_RENDERED: usize = 50;

/// Drops venues well outside the viewport and caps how many get rendered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportCuller {
    pub buffer_factor: f64,
    pub max_rendered: usize,
}

impl Default for ViewportCuller {
    fn default() -> Self {
        Self {
            buffer_factor: DEFAULT_BUFFER_FACTOR,
            max_rendered: DEFAULT_MAX_RENDERED,
        }
    }
}

impl ViewportCuller {
    /// Venues inside the buffered viewport, in input order.
    pub fn visible<'a>(&self, venues: &'a [Venue], viewport: &Region) -> Vec<&'a Venue> {
        venues
            .iter()
            .filter(|v| viewport.contains(&v.location, self.buffer_factor))
            .collect()
    }

    /// Truncates to the render cap.
    pub fn cap<'a>(&self, mut venues: Vec<&'a Venue>) -> Vec<&'a Venue> {
        venues.truncate(self.max_rendered);
        venues
    }
}
