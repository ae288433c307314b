//! Graph traversal types and algorithms
//!
//! All traversals follow outgoing edges only and may be restricted to a
//! single relationship type. They read the store's adjacency views and never
//! mutate anything.

use crate::edge::Edge;
use crate::error::{Error, Result};
use crate::store::GraphStore;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

/// Which traversal a query runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalMode {
    #[default]
    Bfs,
    Dfs,
    ShortestPath,
    Neighbors,
}

impl fmt::Display for TraversalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bfs => write!(f, "bfs"),
            Self::Dfs => write!(f, "dfs"),
            Self::ShortestPath => write!(f, "shortest_path"),
            Self::Neighbors => write!(f, "neighbors"),
        }
    }
}

/// Traversal query builder
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraversalQuery {
    /// Starting node ID
    pub start: String,

    /// Target node ID (shortest path only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    #[serde(default)]
    pub mode: TraversalMode,

    /// Only follow edges of this relationship type (None = all types)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation_type: Option<String>,
}

impl TraversalQuery {
    pub fn bfs(start: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            mode: TraversalMode::Bfs,
            ..Default::default()
        }
    }

    pub fn dfs(start: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            mode: TraversalMode::Dfs,
            ..Default::default()
        }
    }

    pub fn neighbors(start: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            mode: TraversalMode::Neighbors,
            ..Default::default()
        }
    }

    /// Path finding between two nodes
    pub fn shortest_path(start: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            target: Some(target.into()),
            mode: TraversalMode::ShortestPath,
            relation_type: None,
        }
    }

    /// Restrict the traversal to one relationship type
    pub fn filter_relation_type(mut self, relation_type: impl Into<String>) -> Self {
        self.relation_type = Some(relation_type.into());
        self
    }
}

/// A single path through the graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphPath {
    /// Ordered node IDs from start to target
    pub nodes: Vec<String>,

    /// Edges connecting consecutive nodes
    pub edges: Vec<PathEdge>,
}

impl GraphPath {
    /// Number of hops (edges) in the path
    pub fn hops(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Edge in a path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathEdge {
    pub from: String,
    pub to: String,
    pub relation_type: String,
}

impl From<&Edge> for PathEdge {
    fn from(edge: &Edge) -> Self {
        Self {
            from: edge.from.clone(),
            to: edge.to.clone(),
            relation_type: edge.relation_type.clone(),
        }
    }
}

/// Result of a traversal operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraversalResult {
    pub start: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    pub mode: TraversalMode,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation_type: Option<String>,

    /// Node IDs in visit order (the path's nodes for shortest path)
    pub visited: Vec<String>,

    /// Found path (shortest path only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<GraphPath>,

    pub stats: TraversalStats,
}

/// Traversal statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalStats {
    pub nodes_visited: usize,
    pub edges_traversed: usize,
    pub path_found: bool,
}

/// Graph traversal engine
pub struct TraversalEngine;

impl TraversalEngine {
    /// Execute a traversal query
    pub fn execute(query: &TraversalQuery, store: &GraphStore) -> Result<TraversalResult> {
        tracing::debug!(
            "Executing traversal: mode={}, start={}, target={:?}, relation_type={:?}",
            query.mode,
            query.start,
            query.target,
            query.relation_type
        );

        let filter = query.relation_type.as_deref();
        let mut stats = TraversalStats::default();
        let (visited, path) = match query.mode {
            TraversalMode::Bfs => (Self::run_bfs(store, &query.start, filter, &mut stats)?, None),
            TraversalMode::Dfs => (Self::run_dfs(store, &query.start, filter, &mut stats)?, None),
            TraversalMode::Neighbors => (Self::neighbors(store, &query.start, filter)?, None),
            TraversalMode::ShortestPath => {
                let target = query.target.as_deref().unwrap_or(query.start.as_str());
                let path = Self::find_path(store, &query.start, target, filter, &mut stats)?;
                (path.nodes.clone(), Some(path))
            }
        };

        if query.mode == TraversalMode::Neighbors {
            stats.nodes_visited = visited.len();
            stats.edges_traversed = visited.len();
        }

        Ok(TraversalResult {
            start: query.start.clone(),
            target: query.target.clone(),
            mode: query.mode,
            relation_type: query.relation_type.clone(),
            visited,
            path,
            stats,
        })
    }

    /// Breadth-first visit order from `start`
    pub fn bfs(store: &GraphStore, start: &str, relation_type: Option<&str>) -> Result<Vec<String>> {
        Self::run_bfs(store, start, relation_type, &mut TraversalStats::default())
    }

    /// Depth-first visit order from `start`.
    ///
    /// Neighbors are explored in the order their edges were inserted.
    pub fn dfs(store: &GraphStore, start: &str, relation_type: Option<&str>) -> Result<Vec<String>> {
        Self::run_dfs(store, start, relation_type, &mut TraversalStats::default())
    }

    /// Node IDs of a minimum-hop path from `start` to `end`.
    ///
    /// Returns an empty list when `end` is unreachable.
    pub fn shortest_path(
        store: &GraphStore,
        start: &str,
        end: &str,
        relation_type: Option<&str>,
    ) -> Result<Vec<String>> {
        let path = Self::find_path(
            store,
            start,
            end,
            relation_type,
            &mut TraversalStats::default(),
        )?;
        Ok(path.nodes)
    }

    /// Direct successors of `id` in outgoing-edge order.
    ///
    /// A successor appears once per connecting edge.
    pub fn neighbors(
        store: &GraphStore,
        id: &str,
        relation_type: Option<&str>,
    ) -> Result<Vec<String>> {
        Self::require_node(store, id)?;
        Ok(Self::successors(store, id, relation_type)
            .map(|e| e.to.clone())
            .collect())
    }

    fn run_bfs(
        store: &GraphStore,
        start: &str,
        relation_type: Option<&str>,
        stats: &mut TraversalStats,
    ) -> Result<Vec<String>> {
        Self::require_node(store, start)?;

        let mut seen: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        let mut visited = Vec::new();

        seen.insert(start);
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            visited.push(current.to_string());

            for edge in Self::successors(store, current, relation_type) {
                stats.edges_traversed += 1;
                // Marked at push time so a node is enqueued at most once
                if seen.insert(edge.to.as_str()) {
                    queue.push_back(edge.to.as_str());
                }
            }
        }

        stats.nodes_visited = visited.len();
        tracing::debug!(
            "BFS from {} visited {} nodes, traversed {} edges",
            start,
            stats.nodes_visited,
            stats.edges_traversed
        );
        Ok(visited)
    }

    fn run_dfs(
        store: &GraphStore,
        start: &str,
        relation_type: Option<&str>,
        stats: &mut TraversalStats,
    ) -> Result<Vec<String>> {
        Self::require_node(store, start)?;

        let mut seen: HashSet<&str> = HashSet::new();
        let mut stack: Vec<&str> = vec![start];
        let mut visited = Vec::new();

        while let Some(current) = stack.pop() {
            // A node may sit on the stack several times before its first visit
            if !seen.insert(current) {
                continue;
            }
            visited.push(current.to_string());

            let next: Vec<&Edge> = Self::successors(store, current, relation_type).collect();
            stats.edges_traversed += next.len();
            stack.extend(next.iter().rev().map(|e| e.to.as_str()));
        }

        stats.nodes_visited = visited.len();
        tracing::debug!(
            "DFS from {} visited {} nodes, traversed {} edges",
            start,
            stats.nodes_visited,
            stats.edges_traversed
        );
        Ok(visited)
    }

    /// BFS with predecessor links, stopping once `end` is dequeued
    fn find_path(
        store: &GraphStore,
        start: &str,
        end: &str,
        relation_type: Option<&str>,
        stats: &mut TraversalStats,
    ) -> Result<GraphPath> {
        Self::require_node(store, start)?;
        Self::require_node(store, end)?;

        if start == end {
            stats.nodes_visited = 1;
            stats.path_found = true;
            return Ok(GraphPath {
                nodes: vec![start.to_string()],
                edges: Vec::new(),
            });
        }

        let mut seen: HashSet<&str> = HashSet::new();
        let mut parent: HashMap<&str, &Edge> = HashMap::new();
        let mut queue: VecDeque<&str> = VecDeque::new();

        seen.insert(start);
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            stats.nodes_visited += 1;

            if current == end {
                stats.path_found = true;
                break;
            }

            for edge in Self::successors(store, current, relation_type) {
                stats.edges_traversed += 1;
                if seen.insert(edge.to.as_str()) {
                    parent.insert(edge.to.as_str(), edge);
                    queue.push_back(edge.to.as_str());
                }
            }
        }

        if !stats.path_found {
            tracing::debug!("No path from {} to {}", start, end);
            return Ok(GraphPath::default());
        }

        let path = Self::reconstruct_path(start, end, &parent);
        tracing::debug!("Found path from {} to {} with {} hops", start, end, path.hops());
        Ok(path)
    }

    /// Walk predecessor links back from `end`, then reverse
    fn reconstruct_path(start: &str, end: &str, parent: &HashMap<&str, &Edge>) -> GraphPath {
        let mut nodes = vec![end.to_string()];
        let mut edges = Vec::new();
        let mut current = end;

        while current != start {
            let Some(edge) = parent.get(current) else {
                break;
            };
            edges.push(PathEdge::from(*edge));
            nodes.push(edge.from.clone());
            current = edge.from.as_str();
        }

        nodes.reverse();
        edges.reverse();
        GraphPath { nodes, edges }
    }

    fn successors<'a>(
        store: &'a GraphStore,
        id: &str,
        relation_type: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Edge> + 'a {
        store
            .outgoing(id)
            .filter(move |e| relation_type.map_or(true, |t| e.relation_type == t))
    }

    fn require_node(store: &GraphStore, id: &str) -> Result<()> {
        if store.contains_node(id) {
            Ok(())
        } else {
            Err(Error::NodeNotFound(id.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    fn create_test_graph() -> GraphStore {
        let mut store = GraphStore::new();
        for id in ["A", "B", "C", "D", "E", "F"] {
            store.insert_node(Node::new(id, "N"));
        }

        // A --> B --> C --> D
        //       |     |
        //       v     v
        //       E --> F
        for (from, to) in [("A", "B"), ("B", "C"), ("C", "D"), ("B", "E"), ("C", "F"), ("E", "F")] {
            store.insert_edge(Edge::new(from, to, "connects"));
        }
        store
    }

    #[test]
    fn test_bfs_level_order() {
        let store = create_test_graph();
        let order = TraversalEngine::bfs(&store, "A", None).unwrap();
        assert_eq!(order, ["A", "B", "C", "E", "D", "F"]);
    }

    #[test]
    fn test_dfs_follows_insertion_order() {
        let store = create_test_graph();
        let order = TraversalEngine::dfs(&store, "A", None).unwrap();
        assert_eq!(order, ["A", "B", "C", "D", "F", "E"]);
    }

    #[test]
    fn test_traversal_handles_cycles() {
        let mut store = create_test_graph();
        store.insert_edge(Edge::new("F", "A", "connects"));

        let bfs = TraversalEngine::bfs(&store, "C", None).unwrap();
        assert_eq!(bfs, ["C", "D", "F", "A", "B", "E"]);

        let dfs = TraversalEngine::dfs(&store, "C", None).unwrap();
        assert_eq!(dfs.len(), 6);
    }

    #[test]
    fn test_bfs_shortest_path() {
        let store = create_test_graph();
        let path = TraversalEngine::shortest_path(&store, "A", "D", None).unwrap();
        assert_eq!(path, ["A", "B", "C", "D"]);

        let path = TraversalEngine::shortest_path(&store, "A", "F", None).unwrap();
        assert_eq!(path.len() - 1, 3);
    }

    #[test]
    fn test_shortest_path_to_self() {
        let store = create_test_graph();
        let path = TraversalEngine::shortest_path(&store, "D", "D", None).unwrap();
        assert_eq!(path, ["D"]);
    }

    #[test]
    fn test_no_path_found() {
        let store = create_test_graph();
        // Edges are directed: nothing leads back to A
        let path = TraversalEngine::shortest_path(&store, "D", "A", None).unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn test_missing_nodes_fail() {
        let store = create_test_graph();
        let err = TraversalEngine::bfs(&store, "Z", None).unwrap_err();
        assert_eq!(err, Error::NodeNotFound("Z".to_string()));

        let err = TraversalEngine::shortest_path(&store, "A", "Z", None).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_relation_type_filter() {
        let mut store = GraphStore::new();
        for id in ["A", "B", "C"] {
            store.insert_node(Node::new(id, "N"));
        }
        store.insert_edge(Edge::new("A", "B", "works_at"));
        store.insert_edge(Edge::new("B", "C", "knows"));
        store.insert_edge(Edge::new("A", "C", "knows"));

        let reached = TraversalEngine::bfs(&store, "A", Some("works_at")).unwrap();
        assert_eq!(reached, ["A", "B"]);

        let neighbors = TraversalEngine::neighbors(&store, "A", Some("knows")).unwrap();
        assert_eq!(neighbors, ["C"]);
    }

    #[test]
    fn test_neighbors_repeat_per_edge() {
        let mut store = create_test_graph();
        store.insert_edge(Edge::new("A", "B", "likes"));
        let neighbors = TraversalEngine::neighbors(&store, "A", None).unwrap();
        assert_eq!(neighbors, ["B", "B"]);
    }

    #[test]
    fn test_execute_shortest_path_query() {
        let store = create_test_graph();
        let query = TraversalQuery::shortest_path("A", "F").filter_relation_type("connects");
        let result = TraversalEngine::execute(&query, &store).unwrap();

        assert!(result.stats.path_found);
        let path = result.path.unwrap();
        assert_eq!(path.nodes, ["A", "B", "C", "F"]);
        assert_eq!(path.hops(), 3);
        assert_eq!(path.edges[0].from, "A");
        assert_eq!(result.visited, path.nodes);
    }

    #[test]
    fn test_execute_bfs_query_stats() {
        let store = create_test_graph();
        let result = TraversalEngine::execute(&TraversalQuery::bfs("B"), &store).unwrap();

        assert_eq!(result.visited, ["B", "C", "E", "D", "F"]);
        assert_eq!(result.stats.nodes_visited, 5);
        assert_eq!(result.stats.edges_traversed, 5);
        assert!(result.path.is_none());
    }
}
