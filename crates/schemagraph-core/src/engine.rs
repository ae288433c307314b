//! Graph engine facade
//!
//! `GraphEngine` owns the schema catalog, the graph store and the property
//! index, and is the only entry point that mutates them. Every node or edge
//! mutation runs in a fixed order:
//!
//! 1. `ConstraintValidator` checks the request against catalog and store
//! 2. `GraphStore` commits the change
//! 3. `PropertyIndex` is brought in line (nodes only)
//!
//! A validation failure returns before step 2, so store and index are never
//! partially updated. Schema drops are checked against live data here, since
//! the catalog itself cannot see the store.

use crate::catalog::SchemaCatalog;
use crate::edge::{Direction, Edge};
use crate::error::{Error, Result};
use crate::index::PropertyIndex;
use crate::node::Node;
use crate::query::FindQuery;
use crate::schema::{is_blank, NodeTypeDef, RelationshipTypeDef, TypeKind};
use crate::snapshot::GraphSnapshot;
use crate::store::{GraphStore, RemovedNode};
use crate::traversal::{TraversalEngine, TraversalQuery, TraversalResult};
use crate::validator::ConstraintValidator;
use serde::{Deserialize, Serialize};

/// A node together with its incident edges
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDescription {
    pub node: Node,
    pub outgoing: Vec<Edge>,
    pub incoming: Vec<Edge>,
}

#[derive(Debug, Clone, Default)]
pub struct GraphEngine {
    catalog: SchemaCatalog,
    store: GraphStore,
    index: PropertyIndex,
}

impl GraphEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn index(&self) -> &PropertyIndex {
        &self.index
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Schema Operations
    // ─────────────────────────────────────────────────────────────────────────

    pub fn define_node_type(&mut self, def: NodeTypeDef) -> Result<()> {
        ConstraintValidator::validate_node_type_def(&def)?;
        self.catalog.define_node_type(def)
    }

    pub fn define_relationship_type(&mut self, def: RelationshipTypeDef) -> Result<()> {
        ConstraintValidator::validate_relationship_type_def(&def)?;
        self.catalog.define_relationship_type(def)
    }

    /// Remove a node type, refusing while any node of that type exists
    pub fn drop_node_type(&mut self, name: &str) -> Result<NodeTypeDef> {
        if !self.catalog.node_type_exists(name) {
            return Err(Error::UnknownType {
                kind: TypeKind::Node,
                name: name.to_string(),
            });
        }

        let count = self.store.nodes_of_type(name).count();
        if count > 0 {
            tracing::warn!("Refusing to drop node type {}: {} node(s) in use", name, count);
            return Err(Error::TypeInUse {
                kind: TypeKind::Node,
                name: name.to_string(),
                count,
            });
        }

        self.catalog.remove_node_type(name)
    }

    /// Remove a relationship type, refusing while any edge of that type exists
    pub fn drop_relationship_type(&mut self, name: &str) -> Result<RelationshipTypeDef> {
        if !self.catalog.relationship_type_exists(name) {
            return Err(Error::UnknownType {
                kind: TypeKind::Relationship,
                name: name.to_string(),
            });
        }

        let count = self.store.edges_of_type(name).count();
        if count > 0 {
            tracing::warn!(
                "Refusing to drop relationship type {}: {} edge(s) in use",
                name,
                count
            );
            return Err(Error::TypeInUse {
                kind: TypeKind::Relationship,
                name: name.to_string(),
                count,
            });
        }

        self.catalog.remove_relationship_type(name)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Node Operations
    // ─────────────────────────────────────────────────────────────────────────

    pub fn add_node(&mut self, node: Node) -> Result<()> {
        ConstraintValidator::validate_node_insert(&self.catalog, &self.store, &node)?;

        tracing::info!("Node added: {}", node);
        let id = node.id.clone();
        self.store.insert_node(node);
        if let Some(node) = self.store.node(&id) {
            self.index.index_node(node);
        }
        Ok(())
    }

    /// Delete a node and every edge touching it
    pub fn delete_node(&mut self, id: &str) -> Result<RemovedNode> {
        let node = self
            .store
            .node(id)
            .ok_or_else(|| Error::NodeNotFound(id.to_string()))?;
        self.index.deindex_node(node);

        let removed = self
            .store
            .remove_node(id)
            .ok_or_else(|| Error::NodeNotFound(id.to_string()))?;
        tracing::info!(
            "Node deleted: {} ({} edge(s) removed)",
            id,
            removed.edges.len()
        );
        Ok(removed)
    }

    /// Set (or with `None` / a blank value, remove) one node property.
    ///
    /// Returns the previous value.
    pub fn update_node_property(
        &mut self,
        id: &str,
        key: &str,
        value: Option<&str>,
    ) -> Result<Option<String>> {
        let node = self
            .store
            .node(id)
            .ok_or_else(|| Error::NodeNotFound(id.to_string()))?;
        ConstraintValidator::validate_property_update(
            &self.catalog,
            TypeKind::Node,
            &node.node_type,
            key,
            value,
        )?;

        let value = value.filter(|v| !is_blank(v));
        let node = self
            .store
            .node_mut(id)
            .ok_or_else(|| Error::NodeNotFound(id.to_string()))?;
        let old = match value {
            Some(v) => node.properties.insert(key.to_string(), v.to_string()),
            None => node.properties.remove(key),
        };

        self.index.update_entry(id, key, old.as_deref(), value);
        tracing::info!("Node {} property {} updated", id, key);
        Ok(old)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Edge Operations
    // ─────────────────────────────────────────────────────────────────────────

    pub fn add_edge(&mut self, edge: Edge) -> Result<()> {
        ConstraintValidator::validate_edge_insert(&self.catalog, &self.store, &edge)?;

        tracing::info!("Edge added: {}", edge);
        self.store.insert_edge(edge);
        Ok(())
    }

    pub fn delete_edge(&mut self, from: &str, to: &str, relation_type: &str) -> Result<Edge> {
        let edge = self
            .store
            .remove_edge(from, to, relation_type)
            .ok_or_else(|| Error::EdgeNotFound {
                from: from.to_string(),
                to: to.to_string(),
                relation_type: relation_type.to_string(),
            })?;
        tracing::info!("Edge deleted: {}", edge.key());
        Ok(edge)
    }

    /// Set (or with `None` / a blank value, remove) one edge property.
    ///
    /// Returns the previous value.
    pub fn update_edge_property(
        &mut self,
        from: &str,
        to: &str,
        relation_type: &str,
        key: &str,
        value: Option<&str>,
    ) -> Result<Option<String>> {
        let not_found = || Error::EdgeNotFound {
            from: from.to_string(),
            to: to.to_string(),
            relation_type: relation_type.to_string(),
        };

        if !self.store.edge_exists(from, to, relation_type) {
            return Err(not_found());
        }
        ConstraintValidator::validate_property_update(
            &self.catalog,
            TypeKind::Relationship,
            relation_type,
            key,
            value,
        )?;

        let value = value.filter(|v| !is_blank(v));
        let edge = self
            .store
            .edge_mut(from, to, relation_type)
            .ok_or_else(not_found)?;
        let old = match value {
            Some(v) => edge.properties.insert(key.to_string(), v.to_string()),
            None => edge.properties.remove(key),
        };

        tracing::info!("Edge {} property {} updated", edge.key(), key);
        Ok(old)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.store.node(id)
    }

    pub fn edge(&self, from: &str, to: &str, relation_type: &str) -> Option<&Edge> {
        self.store.edge(from, to, relation_type)
    }

    /// Node with its outgoing and incoming edges
    pub fn describe_node(&self, id: &str) -> Result<NodeDescription> {
        let node = self
            .store
            .node(id)
            .ok_or_else(|| Error::NodeNotFound(id.to_string()))?;
        Ok(NodeDescription {
            node: node.clone(),
            outgoing: self.store.outgoing(id).cloned().collect(),
            incoming: self.store.incoming(id).cloned().collect(),
        })
    }

    /// Nodes of one type, in insertion order
    pub fn find_by_type(&self, node_type: &str) -> Vec<&Node> {
        self.store.nodes_of_type(node_type).collect()
    }

    /// Nodes holding `key = value`, ordered by ID
    pub fn find_by_property(&self, key: &str, value: &str) -> Vec<&Node> {
        self.index
            .lookup(key, value)
            .iter()
            .filter_map(|id| self.store.node(id))
            .collect()
    }

    pub fn find(&self, query: &FindQuery) -> Vec<&Node> {
        match (&query.node_type, &query.property) {
            (None, None) => self.store.nodes().collect(),
            (Some(node_type), None) => self.find_by_type(node_type),
            (None, Some(filter)) => self.find_by_property(&filter.key, &filter.value),
            (Some(node_type), Some(filter)) => self
                .find_by_property(&filter.key, &filter.value)
                .into_iter()
                .filter(|n| n.node_type == *node_type)
                .collect(),
        }
    }

    pub fn outgoing_edges(&self, id: &str) -> Result<Vec<&Edge>> {
        self.require_node(id)?;
        Ok(self.store.outgoing(id).collect())
    }

    pub fn incoming_edges(&self, id: &str) -> Result<Vec<&Edge>> {
        self.require_node(id)?;
        Ok(self.store.incoming(id).collect())
    }

    /// Edges touching `id` in the given direction. A self-loop is listed once.
    pub fn edges_of(&self, id: &str, direction: Direction) -> Result<Vec<&Edge>> {
        self.require_node(id)?;
        let edges = match direction {
            Direction::Outgoing => self.store.outgoing(id).collect(),
            Direction::Incoming => self.store.incoming(id).collect(),
            Direction::Both => self
                .store
                .outgoing(id)
                .chain(self.store.incoming(id).filter(|e| e.from != id))
                .collect(),
        };
        Ok(edges)
    }

    pub fn edges_by_type(&self, relation_type: &str) -> Vec<&Edge> {
        self.store.edges_of_type(relation_type).collect()
    }

    pub fn all_edges(&self) -> Vec<&Edge> {
        self.store.edges().collect()
    }

    /// Node count, optionally restricted to one type
    pub fn count_nodes(&self, node_type: Option<&str>) -> usize {
        match node_type {
            Some(t) => self.store.nodes_of_type(t).count(),
            None => self.store.node_count(),
        }
    }

    /// Edge count, optionally restricted to one relationship type
    pub fn count_edges(&self, relation_type: Option<&str>) -> usize {
        match relation_type {
            Some(t) => self.store.edges_of_type(t).count(),
            None => self.store.edge_count(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Traversal
    // ─────────────────────────────────────────────────────────────────────────

    pub fn neighbors_of(&self, id: &str, relation_type: Option<&str>) -> Result<Vec<String>> {
        TraversalEngine::neighbors(&self.store, id, relation_type)
    }

    pub fn bfs(&self, start: &str, relation_type: Option<&str>) -> Result<Vec<String>> {
        TraversalEngine::bfs(&self.store, start, relation_type)
    }

    pub fn dfs(&self, start: &str, relation_type: Option<&str>) -> Result<Vec<String>> {
        TraversalEngine::dfs(&self.store, start, relation_type)
    }

    pub fn shortest_path(
        &self,
        start: &str,
        end: &str,
        relation_type: Option<&str>,
    ) -> Result<Vec<String>> {
        TraversalEngine::shortest_path(&self.store, start, end, relation_type)
    }

    pub fn traverse(&self, query: &TraversalQuery) -> Result<TraversalResult> {
        TraversalEngine::execute(query, &self.store)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Drop all nodes and edges, keeping the schema
    pub fn clear_graph(&mut self) {
        self.store.clear();
        self.index.clear();
        tracing::info!("Graph data cleared");
    }

    /// Drop all nodes, edges and type definitions
    pub fn clear_all(&mut self) {
        self.store.clear();
        self.index.clear();
        self.catalog.clear();
        tracing::info!("Graph data and schema cleared");
    }

    /// Copy out the full engine state
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            node_types: self.catalog.node_types().cloned().collect(),
            relationship_types: self.catalog.relationship_types().cloned().collect(),
            nodes: self.store.nodes().cloned().collect(),
            edges: self.store.edges().cloned().collect(),
        }
    }

    /// Replace all engine state with a snapshot.
    ///
    /// Constraint checks are skipped; the index is rebuilt from the loaded
    /// nodes. Edges whose endpoints are missing are dropped.
    pub fn bulk_load(&mut self, snapshot: GraphSnapshot) {
        self.clear_all();
        self.catalog
            .restore(snapshot.node_types, snapshot.relationship_types);

        for node in snapshot.nodes {
            self.store.insert_node(node);
        }

        let mut skipped = 0;
        for edge in snapshot.edges {
            if self.store.contains_node(&edge.from) && self.store.contains_node(&edge.to) {
                self.store.insert_edge(edge);
            } else {
                tracing::warn!("Skipping edge with missing endpoint: {}", edge.key());
                skipped += 1;
            }
        }

        self.index = PropertyIndex::rebuild(self.store.nodes());
        tracing::info!(
            "Loaded {} node(s), {} edge(s) ({} skipped)",
            self.store.node_count(),
            self.store.edge_count(),
            skipped
        );
    }

    fn require_node(&self, id: &str) -> Result<()> {
        if self.store.contains_node(id) {
            Ok(())
        } else {
            Err(Error::NodeNotFound(id.to_string()))
        }
    }
}
