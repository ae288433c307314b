//! Point-in-time copy of the whole engine state
//!
//! A snapshot is what persistence backends read and write. Loading one
//! replaces engine state without running constraint checks, so it must come
//! from a graph that was already consistent when it was taken.

use crate::edge::Edge;
use crate::node::Node;
use crate::schema::{NodeTypeDef, RelationshipTypeDef};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub node_types: Vec<NodeTypeDef>,

    #[serde(default)]
    pub relationship_types: Vec<RelationshipTypeDef>,

    /// Nodes in insertion order
    #[serde(default)]
    pub nodes: Vec<Node>,

    /// Edges grouped by source, sources in node insertion order
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl GraphSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node_types(mut self, node_types: Vec<NodeTypeDef>) -> Self {
        self.node_types = node_types;
        self
    }

    pub fn with_relationship_types(mut self, relationship_types: Vec<RelationshipTypeDef>) -> Self {
        self.relationship_types = relationship_types;
        self
    }

    pub fn with_nodes(mut self, nodes: Vec<Node>) -> Self {
        self.nodes = nodes;
        self
    }

    pub fn with_edges(mut self, edges: Vec<Edge>) -> Self {
        self.edges = edges;
        self
    }

    /// True when the snapshot holds neither schema nor data
    pub fn is_empty(&self) -> bool {
        self.node_types.is_empty()
            && self.relationship_types.is_empty()
            && self.nodes.is_empty()
            && self.edges.is_empty()
    }
}
