//! Search-service collaborator.
//!
//! The engine never talks to the network itself. It hands out
//! [`SearchQuery`](crate::query::SearchQuery) values tagged with a ticket
//! from the [`RequestSequencer`]; whoever executes them goes through a
//! [`SearchService`] implementation and reports the result back. Responses
//! whose ticket is no longer current are discarded.

mod client;
mod error;
mod response;
mod sequencer;

pub use client::{HttpSearchClient, SearchService, DEFAULT_HTTP_TIMEOUT, DEFAULT_SEARCH_PATH};
pub use error::SearchError;
pub use response::{parse_search_response, SearchResponse};
pub use sequencer::{RequestSequencer, RequestTicket};
