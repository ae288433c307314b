//! Schema definitions for node and relationship types

use crate::node::Properties;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which registry a type name belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Node,
    Relationship,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node => write!(f, "node"),
            Self::Relationship => write!(f, "relationship"),
        }
    }
}

/// Required and optional property keys of a type.
///
/// Both lists keep declaration order and never share a key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(default)]
    required: Vec<String>,
    #[serde(default)]
    optional: Vec<String>,
}

impl PropertySchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a required key. A key previously declared optional is promoted.
    pub fn require(&mut self, key: impl Into<String>) {
        let key = key.into();
        if self.required.contains(&key) {
            return;
        }
        self.optional.retain(|k| *k != key);
        self.required.push(key);
    }

    /// Declare an optional key. No-op if the key is already known.
    pub fn allow(&mut self, key: impl Into<String>) {
        let key = key.into();
        if !self.required.contains(&key) && !self.optional.contains(&key) {
            self.optional.push(key);
        }
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }

    pub fn optional(&self) -> &[String] {
        &self.optional
    }

    pub fn is_required(&self, key: &str) -> bool {
        self.required.iter().any(|k| k == key)
    }

    /// Required keys first, then optional keys
    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.required
            .iter()
            .chain(self.optional.iter())
            .map(String::as_str)
    }

    /// Required keys absent from `properties` or holding a blank value
    pub fn missing_from(&self, properties: &Properties) -> Vec<String> {
        self.required
            .iter()
            .filter(|key| {
                properties
                    .get(key.as_str())
                    .map_or(true, |value| is_blank(value))
            })
            .cloned()
            .collect()
    }
}

/// A value counts as absent when it is empty after trimming.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Definition of a node type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeTypeDef {
    pub name: String,
    #[serde(flatten)]
    pub properties: PropertySchema,
}

impl NodeTypeDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: PropertySchema::new(),
        }
    }

    pub fn with_required<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for key in keys {
            self.properties.require(key);
        }
        self
    }

    pub fn with_optional<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for key in keys {
            self.properties.allow(key);
        }
        self
    }
}

impl fmt::Display for NodeTypeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} required=[{}] optional=[{}]",
            self.name,
            self.properties.required().join(", "),
            self.properties.optional().join(", ")
        )
    }
}

/// Definition of a relationship (edge) type.
///
/// `None` endpoint constraints accept any node type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipTypeDef {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_type: Option<String>,
    #[serde(flatten)]
    pub properties: PropertySchema,
}

impl RelationshipTypeDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            from_type: None,
            to_type: None,
            properties: PropertySchema::new(),
        }
    }

    pub fn from_type(mut self, node_type: impl Into<String>) -> Self {
        self.from_type = Some(node_type.into());
        self
    }

    pub fn to_type(mut self, node_type: impl Into<String>) -> Self {
        self.to_type = Some(node_type.into());
        self
    }

    pub fn with_required<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for key in keys {
            self.properties.require(key);
        }
        self
    }

    pub fn with_optional<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for key in keys {
            self.properties.allow(key);
        }
        self
    }

    /// Whether an edge between nodes of these types satisfies the endpoint constraints
    pub fn allows(&self, from_type: &str, to_type: &str) -> bool {
        let from_ok = self.from_type.as_deref().map_or(true, |t| t == from_type);
        let to_ok = self.to_type.as_deref().map_or(true, |t| t == to_type);
        from_ok && to_ok
    }
}

impl fmt::Display for RelationshipTypeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} -> {}) required=[{}] optional=[{}]",
            self.name,
            self.from_type.as_deref().unwrap_or("*"),
            self.to_type.as_deref().unwrap_or("*"),
            self.properties.required().join(", "),
            self.properties.optional().join(", ")
        )
    }
}
