//! File storage backend
//!
//! Writes go to a sibling temp file that is then renamed over the target, so
//! a crash mid-write leaves the previous file intact.

use crate::error::StorageResult;
use crate::format::SnapshotFormat;
use crate::traits::StorageBackend;
use async_trait::async_trait;
use schemagraph_core::GraphSnapshot;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Single-file storage backend
pub struct FileStorage {
    path: PathBuf,
    format: SnapshotFormat,
}

impl FileStorage {
    /// Open a graph file, picking the format from its extension
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = SnapshotFormat::from_path(&path);
        Self { path, format }
    }

    pub fn with_format(mut self, format: SnapshotFormat) -> Self {
        self.format = format;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> SnapshotFormat {
        self.format
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn ensure_parent(&self) -> StorageResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for FileStorage {
    async fn initialize(&self) -> StorageResult<()> {
        self.ensure_parent().await
    }

    async fn close(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> StorageResult<bool> {
        match tokio::fs::metadata(&self.path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(true),
            Err(e) => Err(e.into()),
        }
    }

    async fn save_snapshot(&self, snapshot: &GraphSnapshot) -> StorageResult<()> {
        let content = self.format.encode(snapshot)?;
        self.ensure_parent().await?;

        let temp = self.temp_path();
        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        // Owner read/write only
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(&temp).await?;
        file.write_all(content.as_bytes()).await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(&temp, &self.path).await?;

        tracing::info!(
            "Graph saved to {} (nodes={}, edges={})",
            self.path.display(),
            snapshot.nodes.len(),
            snapshot.edges.len()
        );
        Ok(())
    }

    async fn load_snapshot(&self) -> StorageResult<Option<GraphSnapshot>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No graph file at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let snapshot = self.format.decode(&content)?;
        tracing::info!(
            "Graph loaded from {} (nodes={}, edges={})",
            self.path.display(),
            snapshot.nodes.len(),
            snapshot.edges.len()
        );
        Ok(Some(snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use schemagraph_core::{Edge, GraphEngine, Node, NodeTypeDef, RelationshipTypeDef};
    use tempfile::TempDir;

    fn sample_engine() -> GraphEngine {
        let mut engine = GraphEngine::new();
        engine
            .define_node_type(NodeTypeDef::new("User").with_required(["name"]))
            .unwrap();
        engine
            .define_relationship_type(RelationshipTypeDef::new("FRIENDS").from_type("User"))
            .unwrap();
        engine
            .add_node(Node::new("u1", "User").with_property("name", "Alice; the |first|"))
            .unwrap();
        engine
            .add_node(Node::new("u2", "User").with_property("name", "Bob"))
            .unwrap();
        engine
            .add_edge(Edge::new("u1", "u2", "FRIENDS").with_property("since", "2020"))
            .unwrap();
        engine
    }

    #[tokio::test]
    async fn test_missing_file_loads_as_none() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::open(dir.path().join("absent.gdb"));

        assert!(storage.health_check().await.unwrap());
        assert!(storage.load_snapshot().await.unwrap().is_none());
        assert_eq!(storage.load_engine().await.unwrap().count_nodes(None), 0);
    }

    #[tokio::test]
    async fn test_save_creates_parent_dirs_and_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deeper").join("graph_data.gdb");
        let storage = FileStorage::open(&path);
        let engine = sample_engine();

        storage.save_engine(&engine).await.unwrap();
        assert!(path.exists());
        assert!(!storage.temp_path().exists());

        let loaded = storage.load_engine().await.unwrap();
        assert_eq!(loaded.snapshot(), engine.snapshot());
        assert_eq!(loaded.find_by_property("name", "Alice; the |first|").len(), 1);
    }

    #[tokio::test]
    async fn test_json_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::open(dir.path().join("graph.json"));
        assert_eq!(storage.format(), SnapshotFormat::Json);

        let snapshot = sample_engine().snapshot();
        storage.save_snapshot(&snapshot).await.unwrap();

        let text = std::fs::read_to_string(storage.path()).unwrap();
        assert!(text.trim_start().starts_with('{'));
        assert_eq!(storage.load_snapshot().await.unwrap(), Some(snapshot));
    }

    #[tokio::test]
    async fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.gdb");
        std::fs::write(&path, "[NODES]\nonly-an-id\n").unwrap();

        let err = FileStorage::open(&path).load_snapshot().await.unwrap_err();
        assert!(matches!(err, StorageError::Format { line: 2, .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let storage = FileStorage::open(dir.path().join("graph_data.gdb"));
        storage.save_snapshot(&GraphSnapshot::new()).await.unwrap();

        let mode = std::fs::metadata(storage.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
