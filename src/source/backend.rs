//! # Source Backend Trait

use super::errors::SourceResult;

/// Storage holding the raw GeoJSON documents of collections
pub trait SourceBackend: Send + Sync + std::fmt::Debug {
    /// Read the document at path
    fn read(&self, path: &str) -> SourceResult<Vec<u8>>;

    /// Write a document to path
    fn write(&self, path: &str, data: &[u8]) -> SourceResult<()>;

    /// Check if a document exists at path
    fn exists(&self, path: &str) -> SourceResult<bool>;
}
