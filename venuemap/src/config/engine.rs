//! Typed settings handed to the map engine.

use std::time::Duration;

use super::defaults::{default_initial_region, DEFAULT_CLUSTER_ZOOM_DELTA, DEFAULT_MAP_ANIMATION};
use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::cull::ViewportCuller;
use crate::debounce::DEFAULT_QUIET_PERIOD;
use crate::dedupe::DedupeConfig;
use crate::geo::Region;
use crate::query::DEFAULT_PAGE_LIMIT;
use crate::radius::RadiusConfig;
use crate::render_gate::RenderGateConfig;
use crate::stagger::{StaggerCounter, DEFAULT_STAGGER_MAX, DEFAULT_STAGGER_STEP};

/// Everything [`MapEngine`](crate::engine::MapEngine) needs, grouped by
/// component.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub initial_region: Region,
    pub quiet_period: Duration,
    pub radius: RadiusConfig,
    pub dedupe: DedupeConfig,
    pub culler: ViewportCuller,
    pub render_gate: RenderGateConfig,
    pub stagger_step: Duration,
    pub stagger_max: Duration,
    pub page_limit: u32,
    pub cluster_zoom_delta: f64,
    pub map_animation: Duration,
}

impl EngineConfig {
    pub fn stagger(&self) -> StaggerCounter {
        StaggerCounter::new(self.stagger_step, self.stagger_max)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_region: default_initial_region(),
            quiet_period: DEFAULT_QUIET_PERIOD,
            radius: RadiusConfig::default(),
            dedupe: DedupeConfig::default(),
            culler: ViewportCuller::default(),
            render_gate: RenderGateConfig::default(),
            stagger_step: DEFAULT_STAGGER_STEP,
            stagger_max: DEFAULT_STAGGER_MAX,
            page_limit: DEFAULT_PAGE_LIMIT,
            cluster_zoom_delta: DEFAULT_CLUSTER_ZOOM_DELTA,
            map_animation: DEFAULT_MAP_ANIMATION,
        }
    }
}

impl TryFrom<&ConfigFile> for EngineConfig {
    type Error = ConfigFileError;

    fn try_from(config: &ConfigFile) -> Result<Self, Self::Error> {
        let markers = &config.markers;
        let render_gate = RenderGateConfig::new(markers.render_window, markers.animation)
            .map_err(|e| ConfigFileError::InvalidValue {
                section: "markers".to_string(),
                key: "render_window_ms".to_string(),
                value: markers.render_window.as_millis().to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            initial_region: config.map.initial_region,
            quiet_period: config.debounce.quiet_period,
            radius: config.radius,
            dedupe: config.dedupe,
            culler: ViewportCuller {
                buffer_factor: markers.buffer_factor,
                max_rendered: markers.max_rendered,
            },
            render_gate,
            stagger_step: markers.stagger_step,
            stagger_max: markers.stagger_max,
            page_limit: config.search.page_limit,
            cluster_zoom_delta: config.map.cluster_zoom_delta,
            map_animation: config.map.animation,
        })
    }
}
