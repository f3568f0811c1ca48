//! # Catalog
//!
//! Collection, layer, override and symbol records. The map engine only reads
//! collections and layers; the single write path it owns is the override
//! upsert.

pub mod collection;
pub mod errors;
pub mod feature_override;
pub mod lock;
pub mod memory;
pub mod snapshot;
pub mod store;
pub mod symbol;

pub use collection::{
    Collection, CollectionFilter, CollectionId, CollectionPatch, Layer, LayerId, LayerPatch,
    NewCollection,
};
pub use errors::{CatalogError, CatalogResult};
pub use feature_override::{CachedDisplay, FeatureOverride, UpsertOutcome};
pub use lock::CatalogLock;
pub use memory::InMemoryCatalog;
pub use snapshot::{CatalogState, SnapshotFile};
pub use store::{CollectionStore, OverrideStore, SymbolStore};
pub use symbol::Symbol;
