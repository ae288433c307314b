//! Edge (relationship) types

use crate::node::{format_properties, Properties};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction for adjacency queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Outgoing,
    Incoming,
    Both,
}

/// Identity of an edge: at most one edge exists per (from, to, relation_type)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeKey {
    pub from: String,
    pub to: String,
    pub relation_type: String,
}

impl EdgeKey {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        relation_type: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            relation_type: relation_type.into(),
        }
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -[{}]-> {}", self.from, self.relation_type, self.to)
    }
}

/// A directed, typed edge between two node identifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Source node ID
    pub from: String,

    /// Destination node ID
    pub to: String,

    /// Relationship type name (e.g. "FRIENDS", "WORKS_AT")
    pub relation_type: String,

    #[serde(default)]
    pub properties: Properties,
}

impl Edge {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        relation_type: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            relation_type: relation_type.into(),
            properties: Properties::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties.extend(properties);
        self
    }

    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(&self.from, &self.to, &self.relation_type)
    }

    /// Whether this edge has the given identity
    pub fn matches(&self, from: &str, to: &str, relation_type: &str) -> bool {
        self.from == from && self.to == to && self.relation_type == relation_type
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -[{}]-> {}", self.from, self.relation_type, self.to)?;
        if !self.properties.is_empty() {
            write!(f, " {}", format_properties(&self.properties))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_creation() {
        let edge = Edge::new("u1", "c1", "WORKS_AT").with_property("since", "2020");

        assert_eq!(edge.from, "u1");
        assert_eq!(edge.to, "c1");
        assert_eq!(edge.relation_type, "WORKS_AT");
        assert_eq!(edge.property("since"), Some("2020"));
        assert!(edge.matches("u1", "c1", "WORKS_AT"));
        assert!(!edge.matches("c1", "u1", "WORKS_AT"));
    }

    #[test]
    fn test_edge_identity_ignores_properties() {
        let a = Edge::new("u1", "u2", "FRIENDS").with_property("since", "2020");
        let b = Edge::new("u1", "u2", "FRIENDS");
        assert_eq!(a.key(), b.key());
        assert_eq!(a.key().to_string(), "u1 -[FRIENDS]-> u2");
    }
}
