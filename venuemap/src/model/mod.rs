//! Venue and cluster data model.
//!
//! Two layers live here:
//!
//! - [`raw`] mirrors what the search service sends, with every field optional
//!   so a single malformed record never fails the whole response.
//! - [`Venue`] and [`Cluster`] are the validated entities the engine renders.
//!   They are created per search response and replaced wholesale by the next
//!   one; nothing patches them in place.

mod cluster;
pub mod raw;
mod venue;

pub use cluster::Cluster;
pub use raw::{RawCenter, RawEntry, RawLocation, RawVenue};
pub use venue::{Address, Cover, Venue};
