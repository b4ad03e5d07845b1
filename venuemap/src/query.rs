//! Search query construction.
//!
//! A [`SearchQuery`] is derived from a settled region, the cluster radius
//! for that region and the user's [`SearchFilters`]. Its [`QueryKey`] is the
//! canonical form used to decide whether issuing it again would be redundant.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::geo::Region;

/// Default page size requested from the search service.
pub const DEFAULT_PAGE_LIMIT: u32 = 100;

/// Free-text and category filters chosen by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub query: Option<String>,
    pub categories: BTreeSet<String>,
}

impl SearchFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the free-text query; blank input clears it.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.set_query(query);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.insert(category.into());
        self
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        let trimmed = query.trim();
        self.query = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }

    /// Adds the category if absent, removes it otherwise.
    ///
    /// Returns `true` if the category is selected afterwards.
    pub fn toggle_category(&mut self, category: &str) -> bool {
        if self.categories.remove(category) {
            false
        } else {
            self.categories.insert(category.to_string());
            true
        }
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_none() && self.categories.is_empty()
    }
}

/// One request to the external search service.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_meters: f64,
    pub free_text: Option<String>,
    /// Category names in sorted order.
    pub categories: Vec<String>,
    pub limit: u32,
    pub offset: u32,
}

impl SearchQuery {
    /// Builds the first page of results around the region's center.
    pub fn for_region(region: &Region, radius_meters: f64, filters: &SearchFilters) -> Self {
        Self {
            latitude: region.latitude,
            longitude: region.longitude,
            radius_meters,
            free_text: filters.query.clone(),
            categories: filters.categories.iter().cloned().collect(),
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    /// Canonical identity of this query.
    pub fn key(&self) -> QueryKey {
        QueryKey(format!(
            "{}|{}|{}|{}|{}|{}|{}",
            self.latitude,
            self.longitude,
            self.radius_meters,
            self.free_text.as_deref().unwrap_or(""),
            self.categories.join(","),
            self.limit,
            self.offset,
        ))
    }

    /// HTTP query-string pairs in the service's parameter names.
    ///
    /// The radius is sent as a whole number of metres under `distance`;
    /// categories are comma-joined under `category`.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("latitude", self.latitude.to_string()),
            ("longitude", self.longitude.to_string()),
            ("distance", format!("{:.0}", self.radius_meters)),
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ];
        if let Some(q) = &self.free_text {
            params.push(("q", q.clone()));
        }
        if !self.categories.is_empty() {
            params.push(("category", self.categories.join(",")));
        }
        params
    }
}

/// Canonical string form of a [`SearchQuery`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(String);

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region() -> Region {
        Region {
            latitude: 40.179,
            longitude: 44.499,
            latitude_delta: 0.1,
            longitude_delta: 0.1,
        }
    }

    #[test]
    fn test_toggle_category() {
        let mut filters = SearchFilters::new();
        assert!(filters.toggle_category("yoga"));
        assert!(filters.categories.contains("yoga"));
        assert!(!filters.toggle_category("yoga"));
        assert!(filters.is_empty());
    }

    #[test]
    fn test_blank_query_clears() {
        let mut filters = SearchFilters::new().with_query("  gym ");
        assert_eq!(filters.query.as_deref(), Some("gym"));
        filters.set_query("   ");
        assert!(filters.query.is_none());
    }

    #[test]
    fn test_key_ignores_category_insertion_order() {
        let a = SearchFilters::new().with_category("yoga").with_category("boxing");
        let b = SearchFilters::new().with_category("boxing").with_category("yoga");

        let qa = SearchQuery::for_region(&region(), 5000.0, &a);
        let qb = SearchQuery::for_region(&region(), 5000.0, &b);
        assert_eq!(qa.key(), qb.key());
        assert_eq!(qa.categories, vec!["boxing", "yoga"]);
    }

    #[test]
    fn test_key_differs_on_radius_and_text() {
        let filters = SearchFilters::new();
        let base = SearchQuery::for_region(&region(), 5000.0, &filters);
        let wider = SearchQuery::for_region(&region(), 7000.0, &filters);
        let text = SearchQuery::for_region(&region(), 5000.0, &filters.clone().with_query("spa"));

        assert_ne!(base.key(), wider.key());
        assert_ne!(base.key(), text.key());
    }

    #[test]
    fn test_params() {
        let filters = SearchFilters::new()
            .with_query("pool")
            .with_category("swim")
            .with_category("aqua");
        let query = SearchQuery::for_region(&region(), 1234.6, &filters);
        let params = query.to_params();

        let get = |name: &str| {
            params
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("distance"), Some("1235"));
        assert_eq!(get("limit"), Some("100"));
        assert_eq!(get("offset"), Some("0"));
        assert_eq!(get("q"), Some("pool"));
        assert_eq!(get("category"), Some("aqua,swim"));
    }

    #[test]
    fn test_params_omit_empty_filters() {
        let query = SearchQuery::for_region(&region(), 100.0, &SearchFilters::new());
        let params = query.to_params();
        assert!(params.iter().all(|(k, _)| *k != "q" && *k != "category"));
    }
}
