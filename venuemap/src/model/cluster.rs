//! Validated cluster entity.

use serde::Serialize;

use crate::geo::GeoPoint;

/// An aggregated marker standing in for more than one venue.
///
/// `id` is only stable for the lifetime of one search response. Clusters with
/// a count of one never exist at this layer; reconciliation turns them into
/// venues.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cluster {
    pub id: String,
    pub count: u64,
    pub center: GeoPoint,
}

impl Cluster {
    /// Identifier derived from the center when the service omits one.
    pub fn synthesized_id(center: &GeoPoint) -> String {
        format!("cluster-{}-{}", center.latitude, center.longitude)
    }
}
