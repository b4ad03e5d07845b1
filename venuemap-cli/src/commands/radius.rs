//! Radius command - print the clustering radius for a viewport.

use std::path::PathBuf;

use venuemap::dedupe::GridDeduplicator;
use venuemap::geo::Region;
use venuemap::radius::ClusterRadiusEstimator;

use crate::error::CliError;
use crate::runner::load_config;

/// Arguments for the radius command.
pub struct RadiusArgs {
    pub lat: f64,
    pub lon: f64,
    pub longitude_delta: f64,
    pub latitude_delta: Option<f64>,
    pub config: Option<PathBuf>,
}

/// Run the radius command.
pub fn run(args: RadiusArgs) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;
    let region = Region::new(
        args.lat,
        args.lon,
        args.latitude_delta.unwrap_or(args.longitude_delta),
        args.longitude_delta,
    )?;

    let estimator = ClusterRadiusEstimator::new(config.radius);
    let dedupe = GridDeduplicator::new(config.dedupe);

    println!("Viewport:");
    println!("  Center: {}", region.center());
    println!(
        "  Span: {}° lat × {}° lon",
        region.latitude_delta, region.longitude_delta
    );
    println!();
    println!("Cluster radius: {:.0} m", estimator.estimate(&region));
    println!(
        "Marker dedup: {}",
        if dedupe.is_active(&region) {
            "active"
        } else {
            "off (zoomed in)"
        }
    );

    Ok(())
}
