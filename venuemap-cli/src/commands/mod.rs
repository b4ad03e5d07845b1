//! CLI command implementations.
//!
//! # Command Modules
//!
//! - [`radius`] - Clustering radius for a viewport (offline)
//! - [`replay`] - Replay a recorded scenario through the engine (offline)
//! - [`search`] - One live search against the configured service

pub mod radius;
pub mod replay;
pub mod search;
