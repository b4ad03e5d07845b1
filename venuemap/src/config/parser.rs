//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use ini::Ini;

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::geo::Region;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [debounce] section
    if let Some(section) = ini.section(Some("debounce")) {
        if let Some(v) = section.get("quiet_period_ms") {
            config.debounce.quiet_period = parse_millis("debounce", "quiet_period_ms", v)?;
        }
    }

    // [radius] section
    if let Some(section) = ini.section(Some("radius")) {
        if let Some(v) = section.get("tight_threshold") {
            config.radius.tight_threshold = parse_positive("radius", "tight_threshold", v)?;
        }
        if let Some(v) = section.get("tight_factor") {
            config.radius.tight_factor = parse_positive("radius", "tight_factor", v)?;
        }
        if let Some(v) = section.get("medium_threshold") {
            config.radius.medium_threshold = parse_positive("radius", "medium_threshold", v)?;
        }
        if let Some(v) = section.get("medium_factor") {
            config.radius.medium_factor = parse_positive("radius", "medium_factor", v)?;
        }
        if config.radius.tight_threshold > config.radius.medium_threshold {
            return Err(ConfigFileError::InvalidValue {
                section: "radius".to_string(),
                key: "tight_threshold".to_string(),
                value: config.radius.tight_threshold.to_string(),
                reason: "must not exceed medium_threshold".to_string(),
            });
        }
    }

    // [dedupe] section
    if let Some(section) = ini.section(Some("dedupe")) {
        if let Some(v) = section.get("grid_size") {
            config.dedupe.grid_size = parse_positive("dedupe", "grid_size", v)?;
        }
        if let Some(v) = section.get("min_longitude_delta") {
            config.dedupe.min_longitude_delta =
                parse_value("dedupe", "min_longitude_delta", v, "must be a number (degrees)")?;
        }
    }

    // [markers] section
    if let Some(section) = ini.section(Some("markers")) {
        if let Some(v) = section.get("render_window_ms") {
            config.markers.render_window = parse_millis("markers", "render_window_ms", v)?;
        }
        if let Some(v) = section.get("animation_ms") {
            config.markers.animation = parse_millis("markers", "animation_ms", v)?;
        }
        if let Some(v) = section.get("stagger_step_ms") {
            config.markers.stagger_step = parse_millis("markers", "stagger_step_ms", v)?;
        }
        if let Some(v) = section.get("stagger_max_ms") {
            config.markers.stagger_max = parse_millis("markers", "stagger_max_ms", v)?;
        }
        if let Some(v) = section.get("buffer_factor") {
            let parsed: f64 =
                parse_value("markers", "buffer_factor", v, "must be a non-negative number")?;
            if !(parsed.is_finite() && parsed >= 0.0) {
                return Err(invalid(
                    "markers",
                    "buffer_factor",
                    v,
                    "must be a non-negative number",
                ));
            }
            config.markers.buffer_factor = parsed;
        }
        if let Some(v) = section.get("max_rendered") {
            config.markers.max_rendered =
                parse_value("markers", "max_rendered", v, "must be a positive integer")?;
        }
        if config.markers.render_window < config.markers.animation {
            return Err(ConfigFileError::InvalidValue {
                section: "markers".to_string(),
                key: "render_window_ms".to_string(),
                value: config.markers.render_window.as_millis().to_string(),
                reason: format!(
                    "must be at least animation_ms ({})",
                    config.markers.animation.as_millis()
                ),
            });
        }
    }

    // [map] section
    if let Some(section) = ini.section(Some("map")) {
        let mut region = config.map.initial_region;
        if let Some(v) = section.get("latitude") {
            region.latitude = parse_value("map", "latitude", v, "must be a number (degrees)")?;
        }
        if let Some(v) = section.get("longitude") {
            region.longitude = parse_value("map", "longitude", v, "must be a number (degrees)")?;
        }
        if let Some(v) = section.get("latitude_delta") {
            region.latitude_delta = parse_positive("map", "latitude_delta", v)?;
        }
        if let Some(v) = section.get("longitude_delta") {
            region.longitude_delta = parse_positive("map", "longitude_delta", v)?;
        }
        config.map.initial_region = Region::new(
            region.latitude,
            region.longitude,
            region.latitude_delta,
            region.longitude_delta,
        )
        .map_err(|e| ConfigFileError::InvalidValue {
            section: "map".to_string(),
            key: "latitude/longitude".to_string(),
            value: format!("{}, {}", region.latitude, region.longitude),
            reason: e.to_string(),
        })?;

        if let Some(v) = section.get("cluster_zoom_delta") {
            config.map.cluster_zoom_delta = parse_positive("map", "cluster_zoom_delta", v)?;
        }
        if let Some(v) = section.get("animation_ms") {
            config.map.animation = parse_millis("map", "animation_ms", v)?;
        }
    }

    // [search] section
    if let Some(section) = ini.section(Some("search")) {
        if let Some(v) = section.get("base_url") {
            let v = v.trim();
            if !v.is_empty() {
                config.search.base_url = Some(v.to_string());
            }
        }
        if let Some(v) = section.get("timeout_secs") {
            let secs: u64 =
                parse_value("search", "timeout_secs", v, "must be a positive integer (seconds)")?;
            config.search.timeout = Duration::from_secs(secs);
        }
        if let Some(v) = section.get("page_limit") {
            let limit: u32 = parse_value("search", "page_limit", v, "must be a positive integer")?;
            if limit == 0 {
                return Err(invalid("search", "page_limit", v, "must be a positive integer"));
            }
            config.search.page_limit = limit;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_value<T: FromStr>(
    section: &str,
    key: &str,
    value: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, reason))
}

/// Whole milliseconds.
fn parse_millis(section: &str, key: &str, value: &str) -> Result<Duration, ConfigFileError> {
    let ms: u64 = parse_value(
        section,
        key,
        value,
        "must be a non-negative integer (milliseconds)",
    )?;
    Ok(Duration::from_millis(ms))
}

/// Finite number greater than zero.
fn parse_positive(section: &str, key: &str, value: &str) -> Result<f64, ConfigFileError> {
    let reason = "must be a positive number";
    let parsed: f64 = parse_value(section, key, value, reason)?;
    if parsed.is_finite() && parsed > 0.0 {
        Ok(parsed)
    } else {
        Err(invalid(section, key, value, reason))
    }
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
