//! Wire shapes returned by the search service.
//!
//! Every field is optional and loosely typed. Validation happens when a raw
//! record is converted into a [`Venue`] or a cluster center; anything that
//! does not validate is dropped rather than defaulted.

use serde::Deserialize;
use serde_json::Value;

use super::venue::{Address, Cover, Venue};
use crate::geo::GeoPoint;

/// One entry of a search response: either a cluster (`count > 1`, `center`)
/// or a wrapped singleton venue (`count == 1`, `venue`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawEntry {
    pub id: Option<Value>,
    pub count: Option<u64>,
    pub center: Option<RawCenter>,
    pub venue: Option<RawVenue>,
}

impl RawEntry {
    /// The service-provided id as a string, if present and usable.
    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().and_then(value_to_id)
    }
}

/// Cluster center as sent by the service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawCenter {
    pub latitude: Option<Value>,
    pub longitude: Option<Value>,
}

impl RawCenter {
    /// Validated center. Both components must be finite JSON numbers.
    pub fn point(&self) -> Option<GeoPoint> {
        let lat = self.latitude.as_ref()?.as_f64()?;
        let lng = self.longitude.as_ref()?.as_f64()?;
        let point = GeoPoint::new(lat, lng);
        point.is_finite().then_some(point)
    }
}

/// GeoJSON-style location with `[longitude, latitude]` coordinates.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawLocation {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub coordinates: Option<Vec<Value>>,
}

impl RawLocation {
    /// Validated point. The pair must have exactly two finite entries, each a
    /// number or a numeric string.
    pub fn point(&self) -> Option<GeoPoint> {
        let coordinates = self.coordinates.as_ref()?;
        if coordinates.len() != 2 {
            return None;
        }
        let lng = coordinate_value(&coordinates[0])?;
        let lat = coordinate_value(&coordinates[1])?;
        let point = GeoPoint::from_lng_lat([lng, lat]);
        point.is_finite().then_some(point)
    }
}

/// Venue embedded in a singleton cluster, or a bottom-sheet list row.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawVenue {
    pub id: Option<Value>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<RawLocation>,
    pub address: Option<Address>,
    pub covers: Option<Vec<Cover>>,
    pub categories: Option<Vec<CategoryRef>>,
}

impl RawVenue {
    /// Converts into a [`Venue`], or `None` if the id or location is unusable.
    pub fn into_venue(self) -> Option<Venue> {
        let id = self.id.as_ref().and_then(value_to_id)?;
        let location = self.location.as_ref()?.point()?;

        Some(Venue {
            id,
            name: self.name.unwrap_or_default(),
            description: self.description,
            location,
            address: self.address.unwrap_or_default(),
            covers: self.covers.unwrap_or_default(),
            categories: self
                .categories
                .unwrap_or_default()
                .into_iter()
                .map(CategoryRef::into_name)
                .collect(),
        })
    }
}

/// Categories arrive either as bare names or as `{ "name": ... }` objects.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Name(String),
    Named { name: String },
}

impl CategoryRef {
    pub fn into_name(self) -> String {
        match self {
            CategoryRef::Name(name) | CategoryRef::Named { name } => name,
        }
    }
}

fn value_to_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn coordinate_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
