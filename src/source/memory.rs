//! # In-Memory Backend

use std::collections::HashMap;
use std::sync::RwLock;

use super::backend::SourceBackend;
use super::errors::{SourceError, SourceResult};

/// Source documents held in memory
#[derive(Debug, Default)]
pub struct MemoryBackend {
    documents: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop a document, as if its file had been removed from storage
    pub fn remove(&self, path: &str) -> SourceResult<()> {
        let mut documents = self
            .documents
            .write()
            .map_err(|_| SourceError::Unreadable("Lock poisoned".into()))?;
        documents
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| SourceError::NotFound(path.to_string()))
    }
}

impl SourceBackend for MemoryBackend {
    fn read(&self, path: &str) -> SourceResult<Vec<u8>> {
        let documents = self
            .documents
            .read()
            .map_err(|_| SourceError::Unreadable("Lock poisoned".into()))?;
        documents
            .get(path)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(path.to_string()))
    }

    fn write(&self, path: &str, data: &[u8]) -> SourceResult<()> {
        let mut documents = self
            .documents
            .write()
            .map_err(|_| SourceError::Unreadable("Lock poisoned".into()))?;
        documents.insert(path.to_string(), data.to_vec());
        Ok(())
    }

    fn exists(&self, path: &str) -> SourceResult<bool> {
        let documents = self
            .documents
            .read()
            .map_err(|_| SourceError::Unreadable("Lock poisoned".into()))?;
        Ok(documents.contains_key(path))
    }
}
