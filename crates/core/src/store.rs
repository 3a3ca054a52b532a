//! Virtual artifact store.
//!
//! Generated stylesheets and font files live here instead of on disk. The
//! host build graph resolves them as ordinary module paths.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use crate::error::StorageError;

/// In-memory file registry shared with the host build graph.
pub trait ArtifactStore: Send + Sync {
    /// Content previously written at `path`.
    fn read(&self, path: &Path) -> Result<Arc<[u8]>, StorageError>;

    /// Create or replace the file at `path`.
    fn write(&self, path: &Path, content: Vec<u8>) -> Result<(), StorageError>;

    /// Every path currently stored, sorted.
    fn paths(&self) -> Result<Vec<PathBuf>, StorageError>;
}

/// Process-lifetime [`ArtifactStore`] backed by a hash map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: RwLock<HashMap<PathBuf, Arc<[u8]>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.files.read().map(|files| files.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ArtifactStore for MemoryStore {
    fn read(&self, path: &Path) -> Result<Arc<[u8]>, StorageError> {
        let files = self.files.read().map_err(|_| StorageError::Poisoned)?;
        files.get(path).cloned().ok_or_else(|| StorageError::NotFound(path.to_path_buf()))
    }

    fn write(&self, path: &Path, content: Vec<u8>) -> Result<(), StorageError> {
        let mut files = self.files.write().map_err(|_| StorageError::Poisoned)?;
        files.insert(path.to_path_buf(), content.into());
        Ok(())
    }

    fn paths(&self) -> Result<Vec<PathBuf>, StorageError> {
        let files = self.files.read().map_err(|_| StorageError::Poisoned)?;
        let mut paths: Vec<PathBuf> = files.keys().cloned().collect();
        paths.sort();
        Ok(paths)
    }
}
