//! In-memory graph storage
//!
//! Nodes live in an insertion-ordered arena keyed by ID. Edges live in a
//! handle-keyed arena and are referenced from two adjacency views:
//! - outgoing: source ID -> edge handles, in insertion order
//! - incoming: destination ID -> edge handles, in insertion order
//!
//! Both views hold handles into the same arena, so they always describe the
//! same edge set. The store performs no schema or uniqueness validation; it
//! trusts its caller to have run the constraint validator first.

use crate::edge::{Edge, EdgeKey};
use crate::node::Node;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Arena handle for an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct EdgeHandle(u64);

/// A node removed from the store together with its incident edges
#[derive(Debug, Clone)]
pub struct RemovedNode {
    pub node: Node,
    pub edges: Vec<Edge>,
}

#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    nodes: IndexMap<String, Node>,
    edges: HashMap<EdgeHandle, Edge>,
    handles: HashMap<EdgeKey, EdgeHandle>,
    outgoing: HashMap<String, Vec<EdgeHandle>>,
    incoming: HashMap<String, Vec<EdgeHandle>>,
    next_handle: u64,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Node Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert a node and create its (empty) adjacency slots.
    ///
    /// The caller guarantees the ID is not already present.
    pub fn insert_node(&mut self, node: Node) {
        self.outgoing.entry(node.id.clone()).or_default();
        self.incoming.entry(node.id.clone()).or_default();
        self.nodes.insert(node.id.clone(), node);
    }

    /// Remove a node and every edge touching it, in either direction.
    pub fn remove_node(&mut self, id: &str) -> Option<RemovedNode> {
        let node = self.nodes.shift_remove(id)?;
        let mut removed = Vec::new();

        for handle in self.outgoing.remove(id).unwrap_or_default() {
            if let Some(edge) = self.detach(handle) {
                if edge.to != id {
                    Self::unlink(&mut self.incoming, &edge.to, handle);
                }
                removed.push(edge);
            }
        }

        for handle in self.incoming.remove(id).unwrap_or_default() {
            // Self-loops were already detached through the outgoing view
            if let Some(edge) = self.detach(handle) {
                Self::unlink(&mut self.outgoing, &edge.from, handle);
                removed.push(edge);
            }
        }

        tracing::debug!(
            "Removed node {} with {} incident edge(s)",
            node.id,
            removed.len()
        );

        Some(RemovedNode {
            node,
            edges: removed,
        })
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Nodes of one type; the items outlive the borrowed type name
    pub fn nodes_of_type<'a, 'b>(
        &'a self,
        node_type: &'b str,
    ) -> impl Iterator<Item = &'a Node> + 'b
    where
        'a: 'b,
    {
        self.nodes.values().filter(move |n| n.node_type == node_type)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Edge Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert an edge into both adjacency views.
    ///
    /// The caller guarantees both endpoints exist. Re-inserting an existing
    /// (from, to, relation_type) identity replaces that edge's properties in
    /// place instead of creating a second edge.
    pub fn insert_edge(&mut self, edge: Edge) {
        let key = edge.key();
        if let Some(handle) = self.handles.get(&key) {
            if let Some(existing) = self.edges.get_mut(handle) {
                existing.properties = edge.properties;
            }
            return;
        }

        let handle = EdgeHandle(self.next_handle);
        self.next_handle += 1;

        self.outgoing
            .entry(edge.from.clone())
            .or_default()
            .push(handle);
        self.incoming.entry(edge.to.clone()).or_default().push(handle);
        self.handles.insert(key, handle);
        self.edges.insert(handle, edge);
    }

    /// Remove the edge with the given identity from both views
    pub fn remove_edge(&mut self, from: &str, to: &str, relation_type: &str) -> Option<Edge> {
        let handle = self
            .handles
            .get(&EdgeKey::new(from, to, relation_type))
            .copied()?;
        let edge = self.detach(handle)?;
        Self::unlink(&mut self.outgoing, &edge.from, handle);
        Self::unlink(&mut self.incoming, &edge.to, handle);
        Some(edge)
    }

    pub fn edge_exists(&self, from: &str, to: &str, relation_type: &str) -> bool {
        self.handles
            .contains_key(&EdgeKey::new(from, to, relation_type))
    }

    pub fn edge(&self, from: &str, to: &str, relation_type: &str) -> Option<&Edge> {
        self.handles
            .get(&EdgeKey::new(from, to, relation_type))
            .and_then(|h| self.edges.get(h))
    }

    pub fn edge_mut(&mut self, from: &str, to: &str, relation_type: &str) -> Option<&mut Edge> {
        let handle = self
            .handles
            .get(&EdgeKey::new(from, to, relation_type))
            .copied()?;
        self.edges.get_mut(&handle)
    }

    /// Edges leaving `id`, in insertion order
    pub fn outgoing<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.resolve(self.outgoing.get(id))
    }

    /// Edges arriving at `id`, in insertion order
    pub fn incoming<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.resolve(self.incoming.get(id))
    }

    /// Every edge: per-source outgoing lists concatenated in source insertion order
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.nodes
            .keys()
            .flat_map(move |id| self.resolve(self.outgoing.get(id)))
    }

    pub fn edges_of_type<'a, 'b>(
        &'a self,
        relation_type: &'b str,
    ) -> impl Iterator<Item = &'a Edge> + 'b
    where
        'a: 'b,
    {
        self.edges().filter(move |e| e.relation_type == relation_type)
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Drop every node and edge
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.handles.clear();
        self.outgoing.clear();
        self.incoming.clear();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn resolve<'a>(
        &'a self,
        handles: Option<&'a Vec<EdgeHandle>>,
    ) -> impl Iterator<Item = &'a Edge> + 'a {
        handles
            .into_iter()
            .flatten()
            .filter_map(move |h| self.edges.get(h))
    }

    /// Remove an edge from the arena and identity map (not from adjacency views)
    fn detach(&mut self, handle: EdgeHandle) -> Option<Edge> {
        let edge = self.edges.remove(&handle)?;
        self.handles.remove(&edge.key());
        Some(edge)
    }

    fn unlink(view: &mut HashMap<String, Vec<EdgeHandle>>, id: &str, handle: EdgeHandle) {
        if let Some(list) = view.get_mut(id) {
            list.retain(|h| *h != handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids<'a>(edges: impl Iterator<Item = &'a Edge>) -> Vec<String> {
        edges.map(|e| e.key().to_string()).collect()
    }

    fn sample() -> GraphStore {
        let mut store = GraphStore::new();
        for id in ["a", "b", "c"] {
            store.insert_node(Node::new(id, "N"));
        }
        store.insert_edge(Edge::new("a", "b", "R"));
        store.insert_edge(Edge::new("a", "c", "R"));
        store.insert_edge(Edge::new("b", "c", "S"));
        store.insert_edge(Edge::new("c", "a", "R"));
        store
    }

    #[test]
    fn test_adjacency_views() {
        let store = sample();

        assert_eq!(ids(store.outgoing("a")), ["a -[R]-> b", "a -[R]-> c"]);
        assert_eq!(ids(store.incoming("c")), ["a -[R]-> c", "b -[S]-> c"]);
        assert_eq!(store.outgoing("missing").count(), 0);
        assert_eq!(store.edge_count(), 4);
    }

    #[test]
    fn test_all_edges_follow_source_insertion_order() {
        let store = sample();
        assert_eq!(
            ids(store.edges()),
            ["a -[R]-> b", "a -[R]-> c", "b -[S]-> c", "c -[R]-> a"]
        );
    }

    #[test]
    fn test_remove_edge_updates_both_views() {
        let mut store = sample();
        let removed = store.remove_edge("a", "c", "R").unwrap();

        assert_eq!(removed.key().to_string(), "a -[R]-> c");
        assert!(!store.edge_exists("a", "c", "R"));
        assert_eq!(ids(store.outgoing("a")), ["a -[R]-> b"]);
        assert_eq!(ids(store.incoming("c")), ["b -[S]-> c"]);
        assert!(store.remove_edge("a", "c", "R").is_none());
    }

    #[test]
    fn test_remove_node_cascades() {
        let mut store = sample();
        let removed = store.remove_node("c").unwrap();

        assert_eq!(removed.node.id, "c");
        assert_eq!(removed.edges.len(), 3);
        assert_eq!(store.edge_count(), 1);
        assert_eq!(ids(store.edges()), ["a -[R]-> b"]);
        assert_eq!(store.incoming("a").count(), 0);
        assert!(store.remove_node("c").is_none());
    }

    #[test]
    fn test_remove_node_with_self_loop() {
        let mut store = sample();
        store.insert_edge(Edge::new("b", "b", "R"));

        let removed = store.remove_node("b").unwrap();
        assert_eq!(removed.edges.len(), 3);
        assert_eq!(store.edge_count(), 2);
        assert!(store.edges().all(|e| e.from != "b" && e.to != "b"));
    }

    #[test]
    fn test_reinsert_same_identity_replaces_properties() {
        let mut store = sample();
        store.insert_edge(Edge::new("a", "b", "R").with_property("w", "1"));

        assert_eq!(store.edge_count(), 4);
        assert_eq!(store.edge("a", "b", "R").unwrap().property("w"), Some("1"));
        assert_eq!(store.outgoing("a").count(), 2);
    }

    #[test]
    fn test_nodes_keep_insertion_order_after_removal() {
        let mut store = sample();
        store.insert_node(Node::new("d", "M"));
        store.remove_node("b");

        let order: Vec<_> = store.nodes().map(|n| n.id.as_str()).collect();
        assert_eq!(order, ["a", "c", "d"]);
        assert_eq!(store.nodes_of_type("M").count(), 1);
    }

    #[test]
    fn test_clear() {
        let mut store = sample();
        store.clear();
        assert_eq!(store.node_count(), 0);
        assert_eq!(store.edge_count(), 0);
        assert!(!store.edge_exists("a", "b", "R"));
    }
}
