//! # Aggregation Engine
//!
//! Builds the map-data payload from the active layers of the catalog.
//!
//! Failure containment:
//! - a layer whose source is missing, unreadable or malformed is left out
//!   and logged; the remaining layers are still served
//! - any other failure (store errors, panics) yields an empty payload with
//!   an `error` description, never an `Err`

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, error, warn};

use super::display::resolve_display;
use super::errors::{EngineError, EngineResult};
use super::freshness;
use super::view::{FeatureDetail, LayerView, MapData, RenderedCollection};
use super::visibility::{OverrideSet, VisibilityResolver};
use crate::catalog::{Collection, CollectionStore, Layer, OverrideStore, SymbolStore};
use crate::observability::Event;
use crate::source::{feature_properties, RawFeatureCollection, SourceBackend};

/// Read-path composer
#[derive(Clone)]
pub struct Aggregator {
    collections: Arc<dyn CollectionStore>,
    overrides: Arc<dyn OverrideStore>,
    symbols: Arc<dyn SymbolStore>,
    sources: Arc<dyn SourceBackend>,
}

impl Aggregator {
    pub fn new(
        collections: Arc<dyn CollectionStore>,
        overrides: Arc<dyn OverrideStore>,
        symbols: Arc<dyn SymbolStore>,
        sources: Arc<dyn SourceBackend>,
    ) -> Self {
        Self {
            collections,
            overrides,
            symbols,
            sources,
        }
    }

    /// Use one catalog for all three stores
    pub fn from_catalog<C>(catalog: Arc<C>, sources: Arc<dyn SourceBackend>) -> Self
    where
        C: CollectionStore + OverrideStore + SymbolStore + 'static,
    {
        Self::new(catalog.clone(), catalog.clone(), catalog, sources)
    }

    /// Compose map data for the active layers, optionally of one map type.
    ///
    /// Always returns a structurally valid payload.
    pub fn compose(&self, map_type: Option<&str>) -> MapData {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.try_compose(map_type)));

        match outcome {
            Ok(Ok(data)) => data,
            Ok(Err(err)) => {
                error!(
                    event = %Event::AggregationFailed,
                    map_type = map_type.unwrap_or("*"),
                    error = %err,
                    "map data composition failed"
                );
                MapData::failed(err.to_string(), Some(format!("{:?}", err)))
            }
            Err(payload) => {
                let reason = panic_message(payload.as_ref());
                error!(
                    event = %Event::AggregationFailed,
                    map_type = map_type.unwrap_or("*"),
                    panic = %reason,
                    "map data composition panicked"
                );
                let err = EngineError::AggregationFailure(reason);
                MapData::failed(err.to_string(), Some(format!("{:?}", err)))
            }
        }
    }

    /// Compose map data, surfacing failures that are not contained per layer
    pub fn try_compose(&self, map_type: Option<&str>) -> EngineResult<MapData> {
        let selected = self.collections.active_layers(map_type)?;

        let mut layers = Vec::with_capacity(selected.len());
        for (layer, collection) in &selected {
            match self.compose_layer(layer, collection) {
                Ok(view) => layers.push(view),
                Err(err @ (EngineError::SourceUnreadable(_) | EngineError::SourceMalformed(_))) => {
                    warn!(
                        event = %Event::LayerSkipped,
                        layer_id = %layer.id,
                        collection_id = %collection.id,
                        source = %collection.source,
                        error = %err,
                        "layer left out of map data"
                    );
                }
                Err(err) => return Err(err),
            }
        }

        let last_updated = freshness::last_updated(self.collections.as_ref())?;

        debug!(
            event = %Event::MapDataComposed,
            map_type = map_type.unwrap_or("*"),
            selected = selected.len(),
            rendered = layers.len(),
            "map data composed"
        );
        Ok(MapData::new(layers, last_updated))
    }

    /// Build the view of a single layer
    pub fn compose_layer(&self, layer: &Layer, collection: &Collection) -> EngineResult<LayerView> {
        let raw = RawFeatureCollection::load(self.sources.as_ref(), &collection.source)?;
        let overrides = OverrideSet::from_overrides(self.overrides.overrides_for_layer(layer.id)?);
        let resolver = VisibilityResolver::new(layer.is_visible, &overrides);

        let feature_count = raw.len();
        let mut details = Vec::with_capacity(feature_count);
        let mut rendered = Vec::new();

        for (index, feature) in raw.features.into_iter().enumerate() {
            let visibility = resolver.resolve(index);
            let display = resolve_display(feature_properties(&feature), index);

            details.push(FeatureDetail {
                index,
                name: display.name,
                address: display.address,
                is_visible: visibility.feature,
            });
            if visibility.effective {
                rendered.push(feature);
            }
        }

        let symbol = match collection.symbol {
            Some(ref id) => self.symbols.resolve_url(id)?,
            None => None,
        };

        Ok(LayerView {
            id: layer.id,
            name: collection.name.clone(),
            color: collection.color.clone(),
            symbol,
            is_visible: layer.is_visible,
            feature_count,
            features: details,
            geojson: RenderedCollection::new(rendered),
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{
        CachedDisplay, CatalogError, CatalogResult, CollectionFilter, CollectionId,
        CollectionPatch, InMemoryCatalog, LayerId, LayerPatch, NewCollection,
    };
    use crate::source::MemoryBackend;
    use chrono::{DateTime, Utc};
    use serde_json::{json, Value};

    fn point(name: &str) -> Value {
        json!({
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [105.85, 21.03]},
            "properties": {"name": name}
        })
    }

    fn document(features: Vec<Value>) -> Vec<u8> {
        json!({"type": "FeatureCollection", "features": features})
            .to_string()
            .into_bytes()
    }

    struct Fixture {
        catalog: Arc<InMemoryCatalog>,
        sources: Arc<MemoryBackend>,
        aggregator: Aggregator,
    }

    fn fixture() -> Fixture {
        let catalog = Arc::new(InMemoryCatalog::new());
        let sources = Arc::new(MemoryBackend::new());
        let aggregator = Aggregator::from_catalog(catalog.clone(), sources.clone());
        Fixture {
            catalog,
            sources,
            aggregator,
        }
    }

    impl Fixture {
        fn add(&self, name: &str, features: Vec<Value>) -> (Collection, Layer) {
            let path = format!("{}.geojson", name);
            self.sources.write(&path, &document(features)).unwrap();
            self.catalog
                .create_collection(NewCollection::new(name, path))
                .unwrap()
        }
    }

    #[test]
    fn test_empty_catalog() {
        let f = fixture();
        let data = f.aggregator.compose(None);
        assert!(data.layers.is_empty());
        assert_eq!(data.last_updated, None);
        assert!(!data.is_failure());
    }

    #[test]
    fn test_inactive_collection_with_override() {
        let f = fixture();
        let (a, _) = f.add("A", vec![point("a0")]);
        f.catalog
            .update_collection(a.id, CollectionPatch { is_active: Some(false), ..Default::default() })
            .unwrap();
        let (_, b_layer) = f.add("B", vec![point("b0"), point("b1")]);
        f.catalog
            .upsert_override(b_layer.id, 0, false, CachedDisplay::default())
            .unwrap();

        let data = f.aggregator.compose(None);

        assert_eq!(data.layers.len(), 1);
        let b = &data.layers[0];
        assert_eq!(b.name, "B");
        assert_eq!(b.feature_count, 2);
        assert_eq!(b.features.len(), 2);
        assert_eq!((b.features[0].index, b.features[0].is_visible), (0, false));
        assert_eq!((b.features[1].index, b.features[1].is_visible), (1, true));
        assert_eq!(b.geojson.features, vec![point("b1")]);
    }

    #[test]
    fn test_hidden_layer_renders_nothing_but_lists_details() {
        let f = fixture();
        let (_, layer) = f.add("Hidden", vec![point("x"), point("y")]);
        f.catalog
            .upsert_override(layer.id, 1, true, CachedDisplay::default())
            .unwrap();
        f.catalog
            .update_layer(layer.id, LayerPatch { is_visible: Some(false), ..Default::default() })
            .unwrap();

        let data = f.aggregator.compose(None);
        let view = &data.layers[0];

        assert!(!view.is_visible);
        assert!(view.geojson.features.is_empty());
        assert_eq!(view.features.len(), 2);
        assert!(view.features.iter().all(|d| d.is_visible));
    }

    #[test]
    fn test_missing_source_skips_only_that_layer() {
        let f = fixture();
        f.add("first", vec![point("1")]);
        f.add("broken", vec![point("2")]);
        f.add("third", vec![point("3")]);
        f.sources.remove("broken.geojson").unwrap();

        let data = f.aggregator.compose(None);

        assert!(!data.is_failure());
        let names: Vec<&str> = data.layers.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["first", "third"]);
        assert!(data.last_updated.is_some());
    }

    #[test]
    fn test_malformed_source_skips_layer() {
        let f = fixture();
        f.add("good", vec![point("1")]);
        f.sources.write("bad.geojson", b"{\"type\": \"FeatureCollection\"}").unwrap();
        f.catalog
            .create_collection(NewCollection::new("bad", "bad.geojson"))
            .unwrap();

        let data = f.aggregator.compose(None);
        assert_eq!(data.layers.len(), 1);
        assert_eq!(data.layers[0].name, "good");
    }

    #[test]
    fn test_display_fields_and_fallback_names() {
        let f = fixture();
        f.add(
            "Shops",
            vec![
                json!({"type": "Feature", "geometry": null, "properties": {"title": "Bakery", "address": "1 Main St"}}),
                json!({"type": "Feature", "geometry": null, "properties": null}),
                json!("not even a feature"),
            ],
        );

        let data = f.aggregator.compose(None);
        let details = &data.layers[0].features;

        assert_eq!(details[0].name, "Bakery");
        assert_eq!(details[0].address, "1 Main St");
        assert_eq!(details[1].name, "Location #2");
        assert_eq!(details[2].name, "Location #3");
        assert_eq!(data.layers[0].geojson.features.len(), 3);
    }

    #[test]
    fn test_map_type_filter() {
        let f = fixture();
        f.add("embedded", vec![point("e")]);
        f.sources.write("dash.geojson", &document(vec![point("d")])).unwrap();
        f.catalog
            .create_collection(NewCollection::new("dash", "dash.geojson").with_map_type("dashboard"))
            .unwrap();

        let data = f.aggregator.compose(Some("dashboard"));
        assert_eq!(data.layers.len(), 1);
        assert_eq!(data.layers[0].name, "dash");
    }

    #[test]
    fn test_last_updated_covers_excluded_collections() {
        let f = fixture();
        f.add("shown", vec![point("s")]);
        let (hidden, _) = f.add("hidden", vec![point("h")]);
        let hidden = f
            .catalog
            .update_collection(hidden.id, CollectionPatch { is_active: Some(false), ..Default::default() })
            .unwrap();

        let data = f.aggregator.compose(None);
        assert_eq!(data.layers.len(), 1);
        assert_eq!(data.last_updated, Some(hidden.updated_at));
    }

    #[test]
    fn test_symbol_url_resolved() {
        let f = fixture();
        f.catalog
            .create_symbol(crate::catalog::Symbol::new("cafe", "Cafe", "cafe.png"))
            .unwrap();
        f.sources.write("c.geojson", &document(vec![point("c")])).unwrap();
        f.catalog
            .create_collection(NewCollection::new("cafes", "c.geojson").with_symbol("cafe"))
            .unwrap();
        f.add("plain", vec![point("p")]);

        let data = f.aggregator.compose(None);
        assert_eq!(data.layers[0].symbol.as_deref(), Some("/media/symbols/cafe.png"));
        assert_eq!(data.layers[1].symbol, None);
    }

    /// Collection store whose every call fails
    struct FailingStore;

    impl CollectionStore for FailingStore {
        fn create_collection(&self, _: NewCollection) -> CatalogResult<(Collection, Layer)> {
            Err(CatalogError::Internal("offline".into()))
        }
        fn update_collection(&self, _: CollectionId, _: CollectionPatch) -> CatalogResult<Collection> {
            Err(CatalogError::Internal("offline".into()))
        }
        fn delete_collection(&self, _: CollectionId) -> CatalogResult<()> {
            Err(CatalogError::Internal("offline".into()))
        }
        fn get_collection(&self, _: CollectionId) -> CatalogResult<Collection> {
            Err(CatalogError::Internal("offline".into()))
        }
        fn list_collections(&self, _: &CollectionFilter) -> CatalogResult<Vec<Collection>> {
            Err(CatalogError::Internal("offline".into()))
        }
        fn active_layers(&self, _: Option<&str>) -> CatalogResult<Vec<(Layer, Collection)>> {
            Err(CatalogError::Internal("offline".into()))
        }
        fn get_layer(&self, _: LayerId) -> CatalogResult<Layer> {
            Err(CatalogError::Internal("offline".into()))
        }
        fn list_layers(&self) -> CatalogResult<Vec<Layer>> {
            Err(CatalogError::Internal("offline".into()))
        }
        fn update_layer(&self, _: LayerId, _: LayerPatch) -> CatalogResult<Layer> {
            Err(CatalogError::Internal("offline".into()))
        }
        fn set_all_layers_visible(&self, _: bool) -> CatalogResult<usize> {
            Err(CatalogError::Internal("offline".into()))
        }
        fn collection_timestamps(&self) -> CatalogResult<Vec<DateTime<Utc>>> {
            Err(CatalogError::Internal("offline".into()))
        }
    }

    #[test]
    fn test_store_failure_yields_error_payload() {
        let catalog = Arc::new(InMemoryCatalog::new());
        let aggregator = Aggregator::new(
            Arc::new(FailingStore),
            catalog.clone(),
            catalog,
            Arc::new(MemoryBackend::new()),
        );

        let data = aggregator.compose(None);
        assert!(data.is_failure());
        assert!(data.layers.is_empty());
        assert_eq!(data.last_updated, None);
        assert!(data.error.unwrap().contains("offline"));
        assert!(data.debug_info.is_some());
    }

    /// Source backend that panics on read
    #[derive(Debug)]
    struct PanickingBackend;

    impl SourceBackend for PanickingBackend {
        fn read(&self, _: &str) -> crate::source::SourceResult<Vec<u8>> {
            panic!("backend exploded")
        }
        fn write(&self, _: &str, _: &[u8]) -> crate::source::SourceResult<()> {
            Ok(())
        }
        fn exists(&self, _: &str) -> crate::source::SourceResult<bool> {
            Ok(true)
        }
    }

    #[test]
    fn test_panic_is_contained() {
        let catalog = Arc::new(InMemoryCatalog::new());
        catalog
            .create_collection(NewCollection::new("boom", "boom.geojson"))
            .unwrap();
        let aggregator = Aggregator::from_catalog(catalog, Arc::new(PanickingBackend));

        let data = aggregator.compose(None);
        assert!(data.is_failure());
        assert!(data.error.unwrap().contains("backend exploded"));
    }
}
