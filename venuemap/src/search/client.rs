//! Search client trait and HTTP implementation.
//!
//! [`SearchService`] abstracts over how queries reach the service, so the
//! session can be driven by an in-memory fake in tests. [`HttpSearchClient`]
//! issues `GET <base>/content/venues/discover/search` with `reqwest`.

use std::future::Future;
use std::time::Duration;

use super::error::SearchError;
use super::response::{parse_search_response, SearchResponse};
use crate::query::SearchQuery;

/// Default HTTP timeout for one search call.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Venue discovery endpoint, relative to the API base URL.
pub const DEFAULT_SEARCH_PATH: &str = "/content/venues/discover/search";

/// Executes search queries.
pub trait SearchService: Send + Sync {
    /// Runs one query and returns the decoded response.
    fn search(
        &self,
        query: &SearchQuery,
    ) -> impl Future<Output = Result<SearchResponse, SearchError>> + Send;
}

/// Search client using direct HTTP requests.
///
/// Uses a reusable `reqwest::Client` with connection pooling and a request
/// timeout. Retries are left to the caller.
pub struct HttpSearchClient {
    http: reqwest::Client,
    url: String,
}

impl HttpSearchClient {
    /// Creates a client for the API rooted at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SearchError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: search_url(base_url)?,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl SearchService for HttpSearchClient {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, SearchError> {
        let response = self
            .http
            .get(&self.url)
            .query(&query.to_params())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        let parsed = parse_search_response(&bytes)?;

        tracing::debug!(
            entries = parsed.entries.len(),
            radius_meters = query.radius_meters,
            "Search service answered"
        );

        Ok(parsed)
    }
}

fn search_url(base_url: &str) -> Result<String, SearchError> {
    let base = base_url.trim().trim_end_matches('/');
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        return Err(SearchError::InvalidUrl(base_url.to_string()));
    }
    Ok(format!("{}{}", base, DEFAULT_SEARCH_PATH))
}
