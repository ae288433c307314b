//! Node (vertex) types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Property map shared by nodes and edges
pub type Properties = BTreeMap<String, String>;

/// A typed, identified vertex
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier
    pub id: String,

    /// Node type name, resolved against the schema catalog
    pub node_type: String,

    #[serde(default)]
    pub properties: Properties,
}

impl Node {
    /// Create a node with no properties
    pub fn new(id: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
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

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.id, self.node_type)?;
        if !self.properties.is_empty() {
            write!(f, " {}", format_properties(&self.properties))?;
        }
        Ok(())
    }
}

/// Render properties as `{k=v, k2=v2}`
pub fn format_properties(properties: &Properties) -> String {
    let pairs: Vec<String> = properties
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect();
    format!("{{{}}}", pairs.join(", "))
}
