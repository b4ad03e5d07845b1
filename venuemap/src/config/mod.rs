//! Configuration for venuemap.
//!
//! Settings live in `~/.venuemap/config.ini`, one INI section per concern.
//! A missing file means defaults; every key present overlays its default.
//!
//! ```ini
//! [debounce]
//! quiet_period_ms = 150
//!
//! [radius]
//! tight_threshold = 0.01
//! tight_factor = 0.5
//! medium_threshold = 0.05
//! medium_factor = 0.7
//!
//! [dedupe]
//! grid_size = 0.0005
//! min_longitude_delta = 0.005
//!
//! [markers]
//! render_window_ms = 800
//! animation_ms = 300
//! stagger_step_ms = 30
//! stagger_max_ms = 300
//! buffer_factor = 0.5
//! max_rendered = 50
//!
//! [map]
//! latitude = 40.179
//! longitude = 44.499
//! latitude_delta = 1.5
//! longitude_delta = 1.5
//! cluster_zoom_delta = 0.01
//! animation_ms = 300
//!
//! [search]
//! base_url = https://api.example.com
//! timeout_secs = 10
//! page_limit = 100
//!
//! [logging]
//! file = ~/.venuemap/venuemap.log
//! ```

mod defaults;
mod engine;
mod file;
mod parser;
mod settings;

pub use defaults::*;
pub use engine::EngineConfig;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::*;
