//! venuemap CLI - Command-line interface
//!
//! This binary exercises the venuemap engine outside a map view: radius
//! inspection, live discovery searches and deterministic scenario replays.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::radius::RadiusArgs;
use commands::replay::ReplayArgs;
use commands::search::SearchArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "venuemap")]
#[command(version = venuemap::VERSION)]
#[command(about = "Map viewport clustering and venue selection engine", long_about = None)]
struct Cli {
    /// Path to a config file (default: ~/.venuemap/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Mirror debug-level logs to stderr
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the clustering radius and dedup state for a viewport
    Radius {
        /// Center latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Center longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Longitude span in degrees
        #[arg(long)]
        delta: f64,

        /// Latitude span in degrees (defaults to the longitude span)
        #[arg(long)]
        lat_delta: Option<f64>,
    },

    /// Run one discovery search for a viewport
    Search {
        /// Center latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Center longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Span in degrees (both axes)
        #[arg(long, default_value = "0.05")]
        delta: f64,

        /// Free-text query
        #[arg(long, short)]
        query: Option<String>,

        /// Category filter (repeatable)
        #[arg(long = "category", short = 'c')]
        categories: Vec<String>,

        /// Search service base URL (overrides [search] base_url)
        #[arg(long)]
        base_url: Option<String>,

        /// Print JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Replay a recorded scenario through the engine and print a JSON report
    Replay {
        /// Scenario file (JSON)
        scenario: PathBuf,

        /// Pretty-print the report
        #[arg(long)]
        pretty: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let result: Result<(), CliError> = match cli.command {
        Commands::Radius {
            lat,
            lon,
            delta,
            lat_delta,
        } => commands::radius::run(RadiusArgs {
            lat,
            lon,
            longitude_delta: delta,
            latitude_delta: lat_delta,
            config: cli.config,
        }),
        Commands::Search {
            lat,
            lon,
            delta,
            query,
            categories,
            base_url,
            json,
        } => commands::search::run(SearchArgs {
            lat,
            lon,
            delta,
            query,
            categories,
            base_url,
            json,
            config: cli.config,
            debug: cli.debug,
        }),
        Commands::Replay { scenario, pretty } => commands::replay::run(ReplayArgs {
            scenario,
            pretty,
            config: cli.config,
            debug: cli.debug,
        }),
    };

    if let Err(e) = result {
        e.exit();
    }
}
