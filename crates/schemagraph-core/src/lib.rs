//! Schemagraph Core - Schema-enforced property graph engine
//!
//! This crate provides the in-memory engine: typed nodes and directed,
//! typed edges checked against a schema catalog on every mutation, an
//! equality index over node properties, and BFS/DFS/shortest-path
//! traversal. It performs no I/O; persistence lives in
//! `schemagraph-storage`.

pub mod catalog;
pub mod edge;
pub mod engine;
pub mod error;
pub mod index;
pub mod node;
pub mod query;
pub mod schema;
pub mod shared;
pub mod snapshot;
pub mod store;
pub mod traversal;
pub mod validator;

pub use catalog::SchemaCatalog;
pub use edge::{Direction, Edge, EdgeKey};
pub use engine::{GraphEngine, NodeDescription};
pub use error::{Error, Result};
pub use index::PropertyIndex;
pub use node::{Node, Properties};
pub use query::{FindQuery, PropertyFilter};
pub use schema::{NodeTypeDef, PropertySchema, RelationshipTypeDef, TypeKind};
pub use shared::SharedGraph;
pub use snapshot::GraphSnapshot;
pub use store::{GraphStore, RemovedNode};
pub use traversal::{
    GraphPath, PathEdge, TraversalEngine, TraversalMode, TraversalQuery, TraversalResult,
    TraversalStats,
};
pub use validator::ConstraintValidator;
