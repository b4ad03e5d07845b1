//! Validated venue entity.

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// Postal address of a venue. Every component is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub country: Option<String>,
    pub state_or_province: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub street: Option<String>,
    pub house_number: Option<String>,
    pub postal_code: Option<String>,
    pub address_line2: Option<String>,
    pub landmark: Option<String>,
}

impl Address {
    /// Short "district, city" label used by list rows and the details panel.
    pub fn short_label(&self) -> Option<String> {
        let parts: Vec<&str> = [self.district.as_deref(), self.city.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// Cover image reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cover {
    pub url: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// A venue that can be rendered as a single marker.
///
/// The location is always a finite point; records without one never make it
/// past reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Venue {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub location: GeoPoint,
    pub address: Address,
    /// Ordered cover images; the first one is the thumbnail.
    pub covers: Vec<Cover>,
    /// Category names.
    pub categories: Vec<String>,
}

impl Venue {
    /// Minimal venue, mostly useful for tests and scenario files.
    pub fn new(id: impl Into<String>, name: impl Into<String>, location: GeoPoint) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            location,
            address: Address::default(),
            covers: Vec::new(),
            categories: Vec::new(),
        }
    }

    /// Same identity as `other`. Selection compares venues by id only.
    #[inline]
    pub fn same_as(&self, other: &Venue) -> bool {
        self.id == other.id
    }

    pub fn thumbnail(&self) -> Option<&str> {
        self.covers.first().map(|c| c.url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_label_joins_district_and_city() {
        let address = Address {
            district: Some("Kentron".to_string()),
            city: Some("Yerevan".to_string()),
            ..Default::default()
        };
        assert_eq!(address.short_label().as_deref(), Some("Kentron, Yerevan"));
    }

    #[test]
    fn test_short_label_skips_empty_parts() {
        let address = Address {
            district: Some(String::new()),
            city: Some("Gyumri".to_string()),
            ..Default::default()
        };
        assert_eq!(address.short_label().as_deref(), Some("Gyumri"));
        assert!(Address::default().short_label().is_none());
    }

    #[test]
    fn test_same_as_compares_ids_only() {
        let a = Venue::new("v1", "Pool", GeoPoint::new(1.0, 2.0));
        let mut b = a.clone();
        b.name = "Renamed".to_string();
        assert!(a.same_as(&b));
        assert!(!a.same_as(&Venue::new("v2", "Pool", GeoPoint::new(1.0, 2.0))));
    }

    #[test]
    fn test_thumbnail_is_first_cover() {
        let mut venue = Venue::new("v1", "Gym", GeoPoint::new(0.0, 0.0));
        assert!(venue.thumbnail().is_none());
        venue.covers = vec![
            Cover {
                url: "a.jpg".to_string(),
                name: None,
            },
            Cover {
                url: "b.jpg".to_string(),
                name: None,
            },
        ];
        assert_eq!(venue.thumbnail(), Some("a.jpg"));
    }
}
