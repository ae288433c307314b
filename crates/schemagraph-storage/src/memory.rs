//! In-memory storage backend for testing

use crate::error::{StorageError, StorageResult};
use crate::format::SnapshotFormat;
use crate::traits::StorageBackend;
use async_trait::async_trait;
use schemagraph_core::GraphSnapshot;
use std::sync::RwLock;

/// In-memory storage backend
///
/// Keeps the last saved snapshot in encoded form, so a save/load cycle
/// exercises the same codec as the file backend.
pub struct MemoryStorage {
    data: RwLock<Option<String>>,
    format: SnapshotFormat,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::with_format(SnapshotFormat::Flat)
    }

    pub fn with_format(format: SnapshotFormat) -> Self {
        Self {
            data: RwLock::new(None),
            format,
        }
    }

    /// The encoded text of the last save
    pub fn contents(&self) -> StorageResult<Option<String>> {
        let data = self
            .data
            .read()
            .map_err(|e| StorageError::Database(format!("Lock error: {}", e)))?;
        Ok(data.clone())
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageBackend for MemoryStorage {
    async fn initialize(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn close(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> StorageResult<bool> {
        Ok(self.data.read().is_ok())
    }

    async fn save_snapshot(&self, snapshot: &GraphSnapshot) -> StorageResult<()> {
        let encoded = self.format.encode(snapshot)?;
        let mut data = self
            .data
            .write()
            .map_err(|e| StorageError::Database(format!("Lock error: {}", e)))?;
        *data = Some(encoded);
        Ok(())
    }

    async fn load_snapshot(&self) -> StorageResult<Option<GraphSnapshot>> {
        let data = self
            .data
            .read()
            .map_err(|e| StorageError::Database(format!("Lock error: {}", e)))?;
        data.as_deref()
            .map(|text| self.format.decode(text))
            .transpose()
    }
}
