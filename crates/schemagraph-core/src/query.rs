//! Query types for finding nodes

use serde::{Deserialize, Serialize};

/// An equality predicate `key = value` on a node property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyFilter {
    pub key: String,
    pub value: String,
}

impl PropertyFilter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Parse `key=value`, splitting on the first `=`
    pub fn parse(s: &str) -> Option<Self> {
        let (key, value) = s.split_once('=')?;
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        Some(Self::new(key, value.trim()))
    }
}

/// Find query builder.
///
/// With both filters set, candidates come from the property index and are
/// then narrowed by type. With neither set, every node matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindQuery {
    /// Restrict to one node type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,

    /// Restrict to nodes holding one property value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<PropertyFilter>,
}

impl FindQuery {
    /// Match every node
    pub fn all() -> Self {
        Self::default()
    }

    pub fn of_type(node_type: impl Into<String>) -> Self {
        Self::all().with_type(node_type)
    }

    pub fn with_type(mut self, node_type: impl Into<String>) -> Self {
        self.node_type = Some(node_type.into());
        self
    }

    pub fn where_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.property = Some(PropertyFilter::new(key, value));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_query_builder() {
        let query = FindQuery::of_type("User").where_property("city", "Paris");

        assert_eq!(query.node_type.as_deref(), Some("User"));
        assert_eq!(query.property, Some(PropertyFilter::new("city", "Paris")));
        assert_eq!(FindQuery::all().node_type, None);
    }

    #[test]
    fn test_property_filter_parse() {
        assert_eq!(
            PropertyFilter::parse("name = Alice"),
            Some(PropertyFilter::new("name", "Alice"))
        );
        assert_eq!(
            PropertyFilter::parse("expr=a=b"),
            Some(PropertyFilter::new("expr", "a=b"))
        );
        assert_eq!(PropertyFilter::parse("novalue"), None);
        assert_eq!(PropertyFilter::parse("=x"), None);
    }
}
