//! Schemagraph Storage - Persistence for the graph engine
//!
//! This crate encodes engine snapshots to the sectioned flat-file format
//! (or JSON) and provides storage backends that save and load them.

#![allow(clippy::result_large_err)]

pub mod error;
pub mod file;
pub mod format;
pub mod memory;
pub mod traits;

pub use error::{StorageError, StorageResult};
pub use file::FileStorage;
pub use format::{decode, encode, escape, unescape, SnapshotFormat, DEFAULT_GRAPH_FILE};
pub use memory::MemoryStorage;
pub use traits::StorageBackend;
