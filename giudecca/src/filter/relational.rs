//! Data-explorer filters whose values live in a separate over-time layer.

use std::collections::BTreeMap;

/// Maps data-explorer filter names to the feature layer modelling them.
///
/// Layer names are keys of the configured endpoints, so a relational filter
/// is resolved to a URL in two steps: filter name to layer name here, then
/// layer name to endpoint in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationalFilters {
    layers: BTreeMap<String, String>,
}

impl RelationalFilters {
    /// Creates an empty mapping.
    pub fn empty() -> Self {
        Self {
            layers: BTreeMap::new(),
        }
    }

    /// Adds or replaces the layer of a filter.
    pub fn with(mut self, filter: impl Into<String>, layer: impl Into<String>) -> Self {
        self.insert(filter, layer);
        self
    }

    pub fn insert(&mut self, filter: impl Into<String>, layer: impl Into<String>) {
        self.layers.insert(filter.into(), layer.into());
    }

    /// The layer a filter must be queried from, if it is relational.
    pub fn layer_for(&self, filter: &str) -> Option<&str> {
        self.layers.get(filter).map(String::as_str)
    }

    pub fn is_relational(&self, filter: &str) -> bool {
        self.layers.contains_key(filter)
    }

    /// Iterates over `(filter, layer)` pairs in filter-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.layers.iter().map(|(f, l)| (f.as_str(), l.as_str()))
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl Default for RelationalFilters {
    fn default() -> Self {
        Self::empty()
            .with("Product", "Product_Over_Time")
            .with("Min_Employment", "Employment_Over_Time")
            .with("Max_Employment", "Employment_Over_Time")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mapping() {
        let filters = RelationalFilters::default();

        assert_eq!(filters.layer_for("Product"), Some("Product_Over_Time"));
        assert_eq!(filters.layer_for("Min_Employment"), Some("Employment_Over_Time"));
        assert_eq!(filters.layer_for("Max_Employment"), Some("Employment_Over_Time"));
        assert_eq!(filters.len(), 3);
    }

    #[test]
    fn test_plain_filter_is_not_relational() {
        let filters = RelationalFilters::default();

        assert!(!filters.is_relational("English_Name"));
        assert_eq!(filters.layer_for("English_Name"), None);
    }

    #[test]
    fn test_insert_replaces() {
        let mut filters = RelationalFilters::default();
        filters.insert("Product", "Products_v2");

        assert_eq!(filters.layer_for("Product"), Some("Products_v2"));
        assert_eq!(filters.len(), 3);
    }

    #[test]
    fn test_iter_is_sorted() {
        let filters = RelationalFilters::default();
        let names: Vec<&str> = filters.iter().map(|(f, _)| f).collect();

        assert_eq!(names, vec!["Max_Employment", "Min_Employment", "Product"]);
    }
}
