//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing logic.

use std::path::PathBuf;
use std::time::Duration;

use crate::dedupe::DedupeConfig;
use crate::geo::Region;
use crate::radius::RadiusConfig;

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    /// Viewport debounce settings
    pub debounce: DebounceSettings,
    /// Cluster radius zoom tiers
    pub radius: RadiusConfig,
    /// Marker dedup grid
    pub dedupe: DedupeConfig,
    /// Marker rendering and animation timing
    pub markers: MarkerSettings,
    /// Initial region and programmatic map moves
    pub map: MapSettings,
    /// Search service connection
    pub search: SearchSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone)]
pub struct DebounceSettings {
    /// Quiet period after a gesture completes.
    pub quiet_period: Duration,
}

/// Marker rendering configuration.
#[derive(Debug, Clone)]
pub struct MarkerSettings {
    /// How long a marker may re-measure after appearing or changing emphasis.
    /// Never shorter than `animation`.
    pub render_window: Duration,
    /// Entry/emphasis animation length.
    pub animation: Duration,
    pub stagger_step: Duration,
    pub stagger_max: Duration,
    /// Fraction of the span kept beyond each viewport edge.
    pub buffer_factor: f64,
    /// Maximum venue markers rendered at once.
    pub max_rendered: usize,
}

#[derive(Debug, Clone)]
pub struct MapSettings {
    pub initial_region: Region,
    /// Span used when zooming into a tapped cluster.
    pub cluster_zoom_delta: f64,
    /// Duration of programmatic map animations.
    pub animation: Duration,
}

/// Search service configuration.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    /// API base URL. Required for live searches only.
    pub base_url: Option<String>,
    /// HTTP timeout per request.
    pub timeout: Duration,
    /// Page size requested per query.
    pub page_limit: u32,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
