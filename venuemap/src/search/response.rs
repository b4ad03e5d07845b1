//! Response envelope parsing.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, trace};

use super::error::SearchError;
use crate::model::RawEntry;

/// Decoded `response` body of a search call.
#[derive(Debug, Clone, Default)]
pub struct SearchResponse {
    pub entries: Vec<RawEntry>,
    /// Total matches reported by the service, if any.
    pub total: Option<u64>,
}

#[derive(Deserialize)]
struct Envelope {
    response: Body,
}

#[derive(Deserialize)]
struct Body {
    #[serde(default)]
    clusters: Vec<Value>,
    #[serde(default)]
    total: Option<u64>,
}

/// Parses `{ "response": { "clusters": [...], "total": n } }`.
///
/// A broken envelope is an error. Entries that do not deserialize are
/// skipped one by one; semantic validation is left to reconciliation.
pub fn parse_search_response(bytes: &[u8]) -> Result<SearchResponse, SearchError> {
    let envelope: Envelope = serde_json::from_slice(bytes)?;
    let received = envelope.response.clusters.len();

    let entries: Vec<RawEntry> = envelope
        .response
        .clusters
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(entry) => Some(entry),
            Err(e) => {
                trace!(error = %e, "Skipping undecodable search entry");
                None
            }
        })
        .collect();

    debug!(
        received,
        decoded = entries.len(),
        total = envelope.response.total,
        "Search response parsed"
    );

    Ok(SearchResponse {
        entries,
        total: envelope.response.total,
    })
}
