//! venuemap - map viewport clustering and selection engine
//!
//! Turns a map view's viewport events into venue search queries and the
//! search results into a stable, deduplicated marker set, while keeping a
//! single selected venue in sync between the map, a details panel and a
//! list.
//!
//! # High-Level API
//!
//! [`engine::MapEngine`] is the synchronous core; [`session::MapSession`]
//! drives it on a tokio task against a [`search::SearchService`]:
//!
//! ```ignore
//! use std::sync::Arc;
//! use venuemap::config::EngineConfig;
//! use venuemap::engine::MapEngine;
//! use venuemap::search::{HttpSearchClient, DEFAULT_HTTP_TIMEOUT};
//! use venuemap::selection::{InternalController, QueuedAnimator};
//! use venuemap::session::MapSession;
//!
//! let engine = MapEngine::new(
//!     EngineConfig::default(),
//!     InternalController::new(),
//!     QueuedAnimator::new(),
//! );
//! let client = HttpSearchClient::new("https://api.example.com", DEFAULT_HTTP_TIMEOUT)?;
//! let handle = MapSession::new(engine, Arc::new(client), input_rx, output_tx, shutdown).start();
//! ```

pub mod config;
pub mod cull;
pub mod debounce;
pub mod dedupe;
pub mod engine;
pub mod geo;
pub mod logging;
pub mod markers;
pub mod model;
pub mod query;
pub mod radius;
pub mod reconcile;
pub mod render_gate;
pub mod search;
pub mod selection;
pub mod session;
pub mod stagger;

/// Version of the venuemap library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
