//! Thread-safe handle to a single engine
//!
//! Mutations hold the write lock from validation through commit; queries and
//! traversals share the read lock. A poisoned lock is recovered, since every
//! engine operation either completes or returns before touching state.

use crate::engine::GraphEngine;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Clone, Default)]
pub struct SharedGraph {
    inner: Arc<RwLock<GraphEngine>>,
}

impl SharedGraph {
    pub fn new(engine: GraphEngine) -> Self {
        Self {
            inner: Arc::new(RwLock::new(engine)),
        }
    }

    /// Run a query under the shared lock
    pub fn read<T>(&self, f: impl FnOnce(&GraphEngine) -> T) -> T {
        f(&self.read_guard())
    }

    /// Run a mutation under the exclusive lock
    pub fn write<T>(&self, f: impl FnOnce(&mut GraphEngine) -> T) -> T {
        f(&mut self.write_guard())
    }

    fn read_guard(&self) -> RwLockReadGuard<'_, GraphEngine> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, GraphEngine> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<GraphEngine> for SharedGraph {
    fn from(engine: GraphEngine) -> Self {
        Self::new(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::Edge;
    use crate::node::Node;
    use crate::schema::{NodeTypeDef, RelationshipTypeDef};
    use std::thread;

    #[test]
    fn test_concurrent_writers_and_readers() {
        let shared = SharedGraph::default();
        shared
            .write(|engine| {
                engine.define_node_type(NodeTypeDef::new("N"))?;
                engine.define_relationship_type(RelationshipTypeDef::new("NEXT"))
            })
            .unwrap();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let shared = shared.clone();
                thread::spawn(move || {
                    shared.write(|engine| engine.add_node(Node::new(format!("n{}", i), "N")))
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }

        shared
            .write(|engine| engine.add_edge(Edge::new("n0", "n1", "NEXT")))
            .unwrap();

        assert_eq!(shared.read(|engine| engine.count_nodes(None)), 8);
        let reached = shared.read(|engine| engine.bfs("n0", None)).unwrap();
        assert_eq!(reached, ["n0", "n1"]);
    }
}
