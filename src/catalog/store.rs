//! # Store Traits
//!
//! The seams between the map engine and whatever holds the records.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::collection::{
    Collection, CollectionFilter, CollectionId, CollectionPatch, Layer, LayerId, LayerPatch,
    NewCollection,
};
use super::errors::CatalogResult;
use super::feature_override::{CachedDisplay, FeatureOverride, UpsertOutcome};
use super::symbol::Symbol;

/// Collections and their layers
pub trait CollectionStore: Send + Sync {
    /// Create a collection together with its default layer, atomically
    fn create_collection(&self, new: NewCollection) -> CatalogResult<(Collection, Layer)>;

    /// Partially update a collection
    fn update_collection(&self, id: CollectionId, patch: CollectionPatch) -> CatalogResult<Collection>;

    /// Delete a collection, its layer and the layer's overrides
    fn delete_collection(&self, id: CollectionId) -> CatalogResult<()>;

    /// Fetch one collection
    fn get_collection(&self, id: CollectionId) -> CatalogResult<Collection>;

    /// List collections in store order
    fn list_collections(&self, filter: &CollectionFilter) -> CatalogResult<Vec<Collection>>;

    /// Layers whose collection is active (and of `map_type` if given), in store order
    fn active_layers(&self, map_type: Option<&str>) -> CatalogResult<Vec<(Layer, Collection)>>;

    /// Fetch one layer
    fn get_layer(&self, id: LayerId) -> CatalogResult<Layer>;

    /// List every layer in store order
    fn list_layers(&self) -> CatalogResult<Vec<Layer>>;

    /// Update a layer's visibility or order
    fn update_layer(&self, id: LayerId, patch: LayerPatch) -> CatalogResult<Layer>;

    /// Set every layer's visibility, returning how many layers were touched
    fn set_all_layers_visible(&self, visible: bool) -> CatalogResult<usize>;

    /// Last-modified timestamps of every collection, regardless of status
    fn collection_timestamps(&self) -> CatalogResult<Vec<DateTime<Utc>>>;
}

/// Per-feature visibility overrides
pub trait OverrideStore: Send + Sync {
    /// All overrides of one layer, in one call
    fn overrides_for_layer(&self, layer_id: LayerId) -> CatalogResult<Vec<FeatureOverride>>;

    /// Create the override for `(layer_id, feature_index)` or update it in place.
    ///
    /// Must be atomic: concurrent calls for the same key leave exactly one row.
    fn upsert_override(
        &self,
        layer_id: LayerId,
        feature_index: usize,
        is_visible: bool,
        display: CachedDisplay,
    ) -> CatalogResult<(FeatureOverride, UpsertOutcome)>;

    /// Convenience lookup of the override table as `index -> visible`
    fn override_map(&self, layer_id: LayerId) -> CatalogResult<HashMap<usize, bool>> {
        Ok(self
            .overrides_for_layer(layer_id)?
            .into_iter()
            .map(|o| (o.feature_index, o.is_visible))
            .collect())
    }
}

/// Map symbols
pub trait SymbolStore: Send + Sync {
    /// Register a new symbol
    fn create_symbol(&self, symbol: Symbol) -> CatalogResult<Symbol>;

    /// List symbols, optionally only the active ones
    fn list_symbols(&self, active_only: bool) -> CatalogResult<Vec<Symbol>>;

    /// Resolve a symbol reference to a display URL.
    ///
    /// Unknown or inactive symbols resolve to `None`.
    fn resolve_url(&self, id: &str) -> CatalogResult<Option<String>>;
}
