//! Search command - run one discovery query against the live service.
//!
//! Builds the query exactly as the engine would for the given viewport and
//! filters, then prints the reconciled venues and clusters.

use std::path::PathBuf;

use serde::Serialize;
use tracing::info;
use venuemap::geo::Region;
use venuemap::model::{Cluster, Venue};
use venuemap::query::{SearchFilters, SearchQuery};
use venuemap::radius::ClusterRadiusEstimator;
use venuemap::reconcile::reconcile;
use venuemap::search::SearchService;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the search command.
pub struct SearchArgs {
    pub lat: f64,
    pub lon: f64,
    pub delta: f64,
    pub query: Option<String>,
    pub categories: Vec<String>,
    pub base_url: Option<String>,
    pub json: bool,
    pub config: Option<PathBuf>,
    pub debug: bool,
}

#[derive(Serialize)]
struct SearchOutput<'a> {
    query: &'a SearchQuery,
    total: Option<u64>,
    venues: &'a [Venue],
    clusters: &'a [Cluster],
}

/// Run the search command.
pub fn run(args: SearchArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(args.config.as_deref(), args.debug)?;
    runner.log_startup("search");

    let region = Region::new(args.lat, args.lon, args.delta, args.delta)?;
    let filters = build_filters(args.query, args.categories);
    let radius = ClusterRadiusEstimator::new(runner.config().radius).estimate(&region);
    let query = SearchQuery::for_region(&region, radius, &filters)
        .with_limit(runner.engine_config().page_limit);

    let client = runner.search_client(args.base_url.as_deref())?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    let response = runtime.block_on(client.search(&query))?;
    let total = response.total;
    let results = reconcile(response.entries);

    info!(
        venues = results.venues.len(),
        clusters = results.clusters.len(),
        "Search complete"
    );

    if args.json {
        let output = SearchOutput {
            query: &query,
            total,
            venues: &results.venues,
            clusters: &results.clusters,
        };
        let json = serde_json::to_string_pretty(&output).map_err(CliError::Output)?;
        println!("{}", json);
        return Ok(());
    }

    println!("Query: {}", query.key());
    println!("  Radius: {:.0} m", radius);
    if let Some(total) = total {
        println!("  Total reported: {}", total);
    }
    println!();

    println!("Venues ({}):", results.venues.len());
    for venue in &results.venues {
        println!("  {:<24} {} {}", venue.id, venue.location, venue.name);
    }
    println!();

    println!("Clusters ({}):", results.clusters.len());
    for cluster in &results.clusters {
        println!("  {:<24} {} x{}", cluster.id, cluster.center, cluster.count);
    }

    Ok(())
}

fn build_filters(query: Option<String>, categories: Vec<String>) -> SearchFilters {
    let mut filters = SearchFilters::new();
    if let Some(query) = query {
        filters.set_query(query);
    }
    for category in categories {
        let category = category.trim();
        if !category.is_empty() {
            filters.categories.insert(category.to_string());
        }
    }
    filters
}
