//! # Local Filesystem Backend

use std::fs;
use std::path::{Component, Path, PathBuf};

use super::backend::SourceBackend;
use super::errors::{SourceError, SourceResult};

/// Source documents stored under a root directory
#[derive(Debug)]
pub struct LocalBackend {
    root: PathBuf,
}

impl LocalBackend {
    /// Create a new local backend
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a relative source path, refusing anything that escapes the root
    fn full_path(&self, path: &str) -> SourceResult<PathBuf> {
        let relative = Path::new(path);
        let escapes = relative.components().any(|c| {
            matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_))
        });
        if path.is_empty() || escapes {
            return Err(SourceError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl SourceBackend for LocalBackend {
    fn read(&self, path: &str) -> SourceResult<Vec<u8>> {
        let full_path = self.full_path(path)?;

        fs::read(&full_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SourceError::NotFound(path.to_string())
            } else {
                SourceError::Unreadable(format!("{}: {}", path, e))
            }
        })
    }

    fn write(&self, path: &str, data: &[u8]) -> SourceResult<()> {
        let full_path = self.full_path(path)?;

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| SourceError::Unreadable(format!("{}: {}", path, e)))?;
        }

        fs::write(&full_path, data).map_err(|e| SourceError::Unreadable(format!("{}: {}", path, e)))
    }

    fn exists(&self, path: &str) -> SourceResult<bool> {
        Ok(self.full_path(path)?.is_file())
    }
}
