//! # Catalog Lock
//!
//! A persisted catalog has exactly one owning process. The owner holds an
//! exclusive advisory lock on `<snapshot>.lock` until the catalog is
//! dropped; any other `open` on the same snapshot fails with
//! [`CatalogError::Locked`] instead of committing over the owner's state.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use super::errors::{CatalogError, CatalogResult};

#[derive(Debug)]
pub struct CatalogLock {
    path: PathBuf,
    // Released when the descriptor closes
    _file: File,
}

impl CatalogLock {
    /// Lock path used for a snapshot at `snapshot`
    pub fn path_for(snapshot: &Path) -> PathBuf {
        let mut path = snapshot.as_os_str().to_owned();
        path.push(".lock");
        PathBuf::from(path)
    }

    /// Take the lock without waiting
    pub fn acquire(snapshot: &Path) -> CatalogResult<Self> {
        let path = Self::path_for(snapshot);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| CatalogError::Snapshot(format!("failed to create directory: {}", e)))?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| {
                CatalogError::Snapshot(format!("failed to open {}: {}", path.display(), e))
            })?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(Self { path, _file: file }),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                Err(CatalogError::Locked(snapshot.display().to_string()))
            }
            Err(e) => Err(CatalogError::Snapshot(format!(
                "failed to lock {}: {}",
                path.display(),
                e
            ))),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
