//! # In-Memory Catalog
//!
//! One `RwLock` guards collections, layers, overrides and symbols together,
//! so cascading deletes and override upserts are atomic. When opened with a
//! snapshot file, every mutation is committed to disk before it becomes
//! visible to readers, and the snapshot stays locked to this catalog until
//! it is dropped.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use super::collection::{
    Collection, CollectionFilter, CollectionId, CollectionPatch, Layer, LayerId, LayerPatch,
    NewCollection,
};
use super::errors::{CatalogError, CatalogResult};
use super::feature_override::{CachedDisplay, FeatureOverride, UpsertOutcome};
use super::lock::CatalogLock;
use super::snapshot::{CatalogState, SnapshotFile};
use super::store::{CollectionStore, OverrideStore, SymbolStore};
use super::symbol::Symbol;

/// Default prefix for symbol image URLs
pub const DEFAULT_MEDIA_URL: &str = "/media/symbols";

/// Catalog backed by process memory, optionally persisted to a snapshot
#[derive(Debug)]
pub struct InMemoryCatalog {
    state: RwLock<CatalogState>,
    snapshot: Option<SnapshotFile>,
    lock: Option<CatalogLock>,
    media_url: String,
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCatalog {
    /// Ephemeral catalog
    pub fn new() -> Self {
        Self {
            state: RwLock::new(CatalogState::default()),
            snapshot: None,
            lock: None,
            media_url: DEFAULT_MEDIA_URL.to_string(),
        }
    }

    /// Catalog persisted at `path`, loading the existing snapshot if any.
    ///
    /// Fails with [`CatalogError::Locked`] while another catalog has the
    /// same snapshot open.
    pub fn open(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let lock = CatalogLock::acquire(path.as_ref())?;
        let snapshot = SnapshotFile::new(path.as_ref());
        let state = snapshot.read()?.unwrap_or_default();
        tracing::debug!(
            path = %snapshot.path().display(),
            collections = state.collections.len(),
            layers = state.layers.len(),
            "catalog snapshot loaded"
        );
        Ok(Self {
            state: RwLock::new(state),
            snapshot: Some(snapshot),
            lock: Some(lock),
            media_url: DEFAULT_MEDIA_URL.to_string(),
        })
    }

    /// Catalog loaded from the snapshot at `path` without taking ownership.
    ///
    /// Mutations stay in memory; the snapshot is never written.
    pub fn read_only(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let state = SnapshotFile::new(path.as_ref()).read()?.unwrap_or_default();
        Ok(Self {
            state: RwLock::new(state),
            ..Self::new()
        })
    }

    /// Set the prefix used when resolving symbol URLs
    pub fn with_media_url(mut self, media_url: impl Into<String>) -> Self {
        self.media_url = media_url.into();
        self
    }

    pub fn media_url(&self) -> &str {
        &self.media_url
    }

    /// Whether this catalog owns a snapshot lock
    pub fn is_locked(&self) -> bool {
        self.lock.is_some()
    }

    /// Write the current state to the snapshot file, if one is configured
    pub fn flush(&self) -> CatalogResult<()> {
        match self.snapshot {
            Some(ref snapshot) => snapshot.write(&*self.read()?),
            None => Ok(()),
        }
    }

    fn read(&self) -> CatalogResult<RwLockReadGuard<'_, CatalogState>> {
        self.state
            .read()
            .map_err(|_| CatalogError::Internal("Lock poisoned".into()))
    }

    fn write(&self) -> CatalogResult<RwLockWriteGuard<'_, CatalogState>> {
        self.state
            .write()
            .map_err(|_| CatalogError::Internal("Lock poisoned".into()))
    }

    /// Apply a mutation under the write lock.
    ///
    /// With a snapshot configured the mutation runs on a copy that replaces
    /// the live state only after it has been committed to disk.
    fn mutate<T>(&self, f: impl FnOnce(&mut CatalogState) -> CatalogResult<T>) -> CatalogResult<T> {
        let mut state = self.write()?;
        match self.snapshot {
            Some(ref snapshot) => {
                let mut next = state.clone();
                let out = f(&mut next)?;
                snapshot.write(&next)?;
                *state = next;
                Ok(out)
            }
            None => f(&mut *state),
        }
    }
}

fn find_collection(state: &CatalogState, id: CollectionId) -> CatalogResult<&Collection> {
    state
        .collections
        .iter()
        .find(|c| c.id == id)
        .ok_or(CatalogError::CollectionNotFound(id))
}

fn find_layer(state: &CatalogState, id: LayerId) -> CatalogResult<&Layer> {
    state
        .layers
        .iter()
        .find(|l| l.id == id)
        .ok_or(CatalogError::LayerNotFound(id))
}

impl CollectionStore for InMemoryCatalog {
    fn create_collection(&self, new: NewCollection) -> CatalogResult<(Collection, Layer)> {
        self.mutate(|state| {
            let collection_id = CollectionId::new(state.next_collection_id + 1);
            let layer_id = LayerId::new(state.next_layer_id + 1);

            let collection = new.into_collection(collection_id, Utc::now())?;
            let layer = Layer::default_for(layer_id, collection_id);

            state.next_collection_id = collection_id.get();
            state.next_layer_id = layer_id.get();
            state.collections.push(collection.clone());
            state.layers.push(layer.clone());
            Ok((collection, layer))
        })
    }

    fn update_collection(&self, id: CollectionId, patch: CollectionPatch) -> CatalogResult<Collection> {
        self.mutate(|state| {
            let collection = state
                .collections
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or(CatalogError::CollectionNotFound(id))?;
            patch.apply(collection, Utc::now())?;
            Ok(collection.clone())
        })
    }

    fn delete_collection(&self, id: CollectionId) -> CatalogResult<()> {
        self.mutate(|state| {
            find_collection(state, id)?;

            let orphaned: Vec<u64> = state
                .layers
                .iter()
                .filter(|l| l.collection_id == id)
                .map(|l| l.id.get())
                .collect();
            for layer_id in &orphaned {
                state.overrides.remove(layer_id);
            }
            state.layers.retain(|l| l.collection_id != id);
            state.collections.retain(|c| c.id != id);
            Ok(())
        })
    }

    fn get_collection(&self, id: CollectionId) -> CatalogResult<Collection> {
        let state = self.read()?;
        find_collection(&state, id).cloned()
    }

    fn list_collections(&self, filter: &CollectionFilter) -> CatalogResult<Vec<Collection>> {
        let state = self.read()?;
        Ok(state
            .collections
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect())
    }

    fn active_layers(&self, map_type: Option<&str>) -> CatalogResult<Vec<(Layer, Collection)>> {
        let state = self.read()?;
        let filter = CollectionFilter::active(map_type);

        let mut selected = Vec::new();
        for layer in &state.layers {
            let collection = find_collection(&state, layer.collection_id)?;
            if filter.matches(collection) {
                selected.push((layer.clone(), collection.clone()));
            }
        }
        Ok(selected)
    }

    fn get_layer(&self, id: LayerId) -> CatalogResult<Layer> {
        let state = self.read()?;
        find_layer(&state, id).cloned()
    }

    fn list_layers(&self) -> CatalogResult<Vec<Layer>> {
        Ok(self.read()?.layers.clone())
    }

    fn update_layer(&self, id: LayerId, patch: LayerPatch) -> CatalogResult<Layer> {
        self.mutate(|state| {
            let layer = state
                .layers
                .iter_mut()
                .find(|l| l.id == id)
                .ok_or(CatalogError::LayerNotFound(id))?;
            patch.apply(layer);
            Ok(layer.clone())
        })
    }

    fn set_all_layers_visible(&self, visible: bool) -> CatalogResult<usize> {
        self.mutate(|state| {
            for layer in state.layers.iter_mut() {
                layer.is_visible = visible;
            }
            Ok(state.layers.len())
        })
    }

    fn collection_timestamps(&self) -> CatalogResult<Vec<DateTime<Utc>>> {
        let state = self.read()?;
        Ok(state.collections.iter().map(|c| c.updated_at).collect())
    }
}

impl OverrideStore for InMemoryCatalog {
    fn overrides_for_layer(&self, layer_id: LayerId) -> CatalogResult<Vec<FeatureOverride>> {
        let state = self.read()?;
        Ok(state
            .overrides
            .get(&layer_id.get())
            .map(|by_index| by_index.values().cloned().collect())
            .unwrap_or_default())
    }

    fn upsert_override(
        &self,
        layer_id: LayerId,
        feature_index: usize,
        is_visible: bool,
        display: CachedDisplay,
    ) -> CatalogResult<(FeatureOverride, UpsertOutcome)> {
        self.mutate(|state| {
            // The layer may have been deleted since the caller looked it up
            find_layer(state, layer_id)?;

            let by_index = state
                .overrides
                .entry(layer_id.get())
                .or_insert_with(BTreeMap::new);

            let outcome = if by_index.contains_key(&feature_index) {
                UpsertOutcome::Updated
            } else {
                UpsertOutcome::Created
            };

            let row = by_index
                .entry(feature_index)
                .or_insert_with(|| FeatureOverride::new(layer_id, feature_index, is_visible));
            row.is_visible = is_visible;
            if display.name.is_some() {
                row.feature_name = display.name;
            }
            if display.address.is_some() {
                row.feature_address = display.address;
            }
            Ok((row.clone(), outcome))
        })
    }
}

impl SymbolStore for InMemoryCatalog {
    fn create_symbol(&self, symbol: Symbol) -> CatalogResult<Symbol> {
        symbol.validate()?;
        self.mutate(|state| {
            if state.symbols.iter().any(|s| s.id == symbol.id) {
                return Err(CatalogError::SymbolAlreadyExists(symbol.id));
            }
            state.symbols.push(symbol.clone());
            Ok(symbol)
        })
    }

    fn list_symbols(&self, active_only: bool) -> CatalogResult<Vec<Symbol>> {
        let state = self.read()?;
        Ok(state
            .symbols
            .iter()
            .filter(|s| !active_only || s.is_active)
            .cloned()
            .collect())
    }

    fn resolve_url(&self, id: &str) -> CatalogResult<Option<String>> {
        let state = self.read()?;
        Ok(state
            .symbols
            .iter()
            .find(|s| s.id == id && s.is_active)
            .map(|s| s.url(&self.media_url)))
    }
}
