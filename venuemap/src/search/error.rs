//! Error types for the search-service client.

use thiserror::Error;

/// Errors that can occur when querying the search service.
///
/// None of these clear the map: the engine keeps the previous result set.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The HTTP client could not be built or the request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The service answered with a non-success status.
    #[error("Search service returned status {status}")]
    Status { status: u16 },

    /// The response envelope could not be parsed.
    #[error("Failed to parse response: {0}")]
    Json(String),

    /// The base URL could not be combined with the search path.
    #[error("Invalid search URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        SearchError::Http(e.to_string())
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(e: serde_json::Error) -> Self {
        SearchError::Json(e.to_string())
    }
}
