//! Default values for every configuration setting and the
//! `ConfigFile::default()` implementation.

use std::time::Duration;

use super::file::config_directory;
use super::settings::*;
use crate::cull::{DEFAULT_BUFFER_FACTOR, DEFAULT_MAX_RENDERED};
use crate::debounce::DEFAULT_QUIET_PERIOD;
use crate::geo::Region;
use crate::query::DEFAULT_PAGE_LIMIT;
use crate::radius::RadiusConfig;
use crate::render_gate::{DEFAULT_MARKER_ANIMATION, DEFAULT_RENDER_WINDOW};
use crate::search::DEFAULT_HTTP_TIMEOUT;
use crate::stagger::{DEFAULT_STAGGER_MAX, DEFAULT_STAGGER_STEP};

// =============================================================================
// Map defaults
// =============================================================================

/// Initial map center latitude (Yerevan).
pub const DEFAULT_MAP_LATITUDE: f64 = 40.179;

/// Initial map center longitude (Yerevan).
pub const DEFAULT_MAP_LONGITUDE: f64 = 44.499;

/// Initial span in degrees, both axes.
pub const DEFAULT_MAP_DELTA: f64 = 1.5;

/// Span used when zooming into a tapped cluster.
pub const DEFAULT_CLUSTER_ZOOM_DELTA: f64 = 0.01;

/// Duration of programmatic map animations.
pub const DEFAULT_MAP_ANIMATION: Duration = Duration::from_millis(300);

/// The region shown before the user moves the map.
pub fn default_initial_region() -> Region {
    Region {
        latitude: DEFAULT_MAP_LATITUDE,
        longitude: DEFAULT_MAP_LONGITUDE,
        latitude_delta: DEFAULT_MAP_DELTA,
        longitude_delta: DEFAULT_MAP_DELTA,
    }
}

// =============================================================================
// Logging defaults
// =============================================================================

/// Default log file name inside the config directory.
pub const DEFAULT_LOG_FILE_NAME: &str = "venuemap.log";

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            debounce: DebounceSettings {
                quiet_period: DEFAULT_QUIET_PERIOD,
            },
            radius: RadiusConfig::default(),
            dedupe: Default::default(),
            markers: MarkerSettings {
                render_window: DEFAULT_RENDER_WINDOW,
                animation: DEFAULT_MARKER_ANIMATION,
                stagger_step: DEFAULT_STAGGER_STEP,
                stagger_max: DEFAULT_STAGGER_MAX,
                buffer_factor: DEFAULT_BUFFER_FACTOR,
                max_rendered: DEFAULT_MAX_RENDERED,
            },
            map: MapSettings {
                initial_region: default_initial_region(),
                cluster_zoom_delta: DEFAULT_CLUSTER_ZOOM_DELTA,
                animation: DEFAULT_MAP_ANIMATION,
            },
            search: SearchSettings {
                base_url: None,
                timeout: DEFAULT_HTTP_TIMEOUT,
                page_limit: DEFAULT_PAGE_LIMIT,
            },
            logging: LoggingSettings {
                file: config_directory().join(DEFAULT_LOG_FILE_NAME),
            },
        }
    }
}
