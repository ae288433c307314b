//! Storage backend trait definitions

use crate::error::StorageResult;
use async_trait::async_trait;
use schemagraph_core::{GraphEngine, GraphSnapshot};

/// Trait for storage backend implementations
///
/// A backend persists whole snapshots; each save replaces what was stored
/// before.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Initialize the storage (create directories, etc.)
    async fn initialize(&self) -> StorageResult<()>;

    /// Close the storage
    async fn close(&self) -> StorageResult<()>;

    /// Health check
    async fn health_check(&self) -> StorageResult<bool>;

    /// Replace the stored graph with `snapshot`
    async fn save_snapshot(&self, snapshot: &GraphSnapshot) -> StorageResult<()>;

    /// Read the stored graph, or `None` if nothing has been saved yet
    async fn load_snapshot(&self) -> StorageResult<Option<GraphSnapshot>>;

    // ─────────────────────────────────────────────────────────────────────────
    // Engine helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Persist the full state of `engine`
    async fn save_engine(&self, engine: &GraphEngine) -> StorageResult<()> {
        self.save_snapshot(&engine.snapshot()).await
    }

    /// Build an engine from the stored graph (empty if nothing is stored)
    async fn load_engine(&self) -> StorageResult<GraphEngine> {
        let mut engine = GraphEngine::new();
        if let Some(snapshot) = self.load_snapshot().await? {
            engine.bulk_load(snapshot);
        }
        Ok(engine)
    }
}
