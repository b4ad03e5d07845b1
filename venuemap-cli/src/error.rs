//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use venuemap::config::ConfigFileError;
use venuemap::geo::GeoError;
use venuemap::search::SearchError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(ConfigFileError),
    /// Invalid coordinates or span on the command line
    Region(GeoError),
    /// Scenario file could not be read
    ScenarioRead {
        path: String,
        error: std::io::Error,
    },
    /// Scenario file is not valid
    ScenarioParse {
        path: String,
        error: serde_json::Error,
    },
    /// Live search failed
    Search(SearchError),
    /// No search service configured
    MissingBaseUrl,
    /// Failed to start the async runtime
    Runtime(std::io::Error),
    /// Failed to serialize output
    Output(serde_json::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::MissingBaseUrl => {
                eprintln!();
                eprintln!("Set the search service with either:");
                eprintln!("  1. --base-url https://api.example.com");
                eprintln!("  2. base_url under [search] in ~/.venuemap/config.ini");
            }
            CliError::ScenarioParse { .. } => {
                eprintln!();
                eprintln!("A scenario is a JSON object with a \"steps\" array, e.g.:");
                eprintln!("  {{\"steps\": [{{\"at_ms\": 0, \"action\": \"tap_background\"}}]}}");
            }
            _ => {}
        }

        process::exit(match self {
            CliError::Config(_) | CliError::Region(_) | CliError::MissingBaseUrl => 2,
            _ => 1,
        })
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Region(e) => write!(f, "Invalid viewport: {}", e),
            CliError::ScenarioRead { path, error } => {
                write!(f, "Failed to read scenario '{}': {}", path, error)
            }
            CliError::ScenarioParse { path, error } => {
                write!(f, "Invalid scenario '{}': {}", path, error)
            }
            CliError::Search(e) => write!(f, "Search failed: {}", e),
            CliError::MissingBaseUrl => write!(f, "No search service URL configured"),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
            CliError::Output(e) => write!(f, "Failed to write output: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Region(e) => Some(e),
            CliError::ScenarioRead { error, .. } => Some(error),
            CliError::ScenarioParse { error, .. } => Some(error),
            CliError::Search(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            CliError::Output(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<GeoError> for CliError {
    fn from(e: GeoError) -> Self {
        CliError::Region(e)
    }
}

impl From<SearchError> for CliError {
    fn from(e: SearchError) -> Self {
        CliError::Search(e)
    }
}
