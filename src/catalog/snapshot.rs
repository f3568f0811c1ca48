//! # Catalog Snapshot
//!
//! Whole-catalog JSON persistence. A snapshot is replaced with
//! write-temp, fsync, rename so a crash never leaves a torn file.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::collection::{Collection, Layer};
use super::errors::{CatalogError, CatalogResult};
use super::feature_override::FeatureOverride;
use super::symbol::Symbol;

/// Serialized catalog contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogState {
    pub next_collection_id: u64,
    pub next_layer_id: u64,
    pub collections: Vec<Collection>,
    pub layers: Vec<Layer>,
    /// Keyed by layer id, then feature index
    pub overrides: BTreeMap<u64, BTreeMap<usize, FeatureOverride>>,
    pub symbols: Vec<Symbol>,
}

/// Snapshot file location
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
    temp_path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut temp = path.clone().into_os_string();
        temp.push(".tmp");
        Self {
            path,
            temp_path: PathBuf::from(temp),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the snapshot if it exists
    pub fn read(&self) -> CatalogResult<Option<CatalogState>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            CatalogError::Snapshot(format!("failed to read {}: {}", self.path.display(), e))
        })?;
        let state = serde_json::from_str(&content).map_err(|e| {
            CatalogError::Snapshot(format!("invalid snapshot {}: {}", self.path.display(), e))
        })?;
        Ok(Some(state))
    }

    /// Atomically replace the snapshot
    pub fn write(&self, state: &CatalogState) -> CatalogResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| CatalogError::Snapshot(format!("failed to create directory: {}", e)))?;
        }

        let content = serde_json::to_vec_pretty(state)
            .map_err(|e| CatalogError::Snapshot(format!("failed to serialize catalog: {}", e)))?;

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.temp_path)
            .map_err(|e| CatalogError::Snapshot(format!("failed to create temp snapshot: {}", e)))?;

        file.write_all(&content)
            .map_err(|e| CatalogError::Snapshot(format!("failed to write snapshot: {}", e)))?;
        file.sync_all()
            .map_err(|e| CatalogError::Snapshot(format!("failed to fsync snapshot: {}", e)))?;

        fs::rename(&self.temp_path, &self.path)
            .map_err(|e| CatalogError::Snapshot(format!("failed to commit snapshot: {}", e)))?;

        if let Some(parent) = self.path.parent() {
            if let Ok(dir) = File::open(parent) {
                let _ = dir.sync_all();
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_snapshot_reads_none() {
        let temp = TempDir::new().unwrap();
        let file = SnapshotFile::new(temp.path().join("catalog.json"));
        assert!(file.read().unwrap().is_none());
    }

    #[test]
    fn test_write_then_read() {
        let temp = TempDir::new().unwrap();
        let file = SnapshotFile::new(temp.path().join("nested").join("catalog.json"));

        let state = CatalogState {
            next_collection_id: 4,
            next_layer_id: 9,
            symbols: vec![Symbol::new("marker", "Marker", "marker.png")],
            ..Default::default()
        };
        file.write(&state).unwrap();

        let loaded = file.read().unwrap().unwrap();
        assert_eq!(loaded.next_collection_id, 4);
        assert_eq!(loaded.next_layer_id, 9);
        assert_eq!(loaded.symbols.len(), 1);
        assert!(!temp.path().join("nested").join("catalog.json.tmp").exists());
    }

    #[test]
    fn test_corrupt_snapshot_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("catalog.json");
        fs::write(&path, b"{not json").unwrap();

        let result = SnapshotFile::new(&path).read();
        assert!(matches!(result, Err(CatalogError::Snapshot(_))));
    }
}
