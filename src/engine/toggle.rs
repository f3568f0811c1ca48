//! # Toggle Handler
//!
//! Sets the visibility override of one feature. Creating and updating go
//! through the override store's atomic upsert, so repeating a toggle (or
//! racing two of them) converges on a single row.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use super::errors::{EngineError, EngineResult};
use crate::catalog::{CachedDisplay, CatalogError, CollectionStore, LayerId, OverrideStore};
use crate::observability::Event;

/// Raw toggle body, validated by [`ToggleHandler::handle`]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToggleRequest {
    #[serde(default)]
    pub feature_index: Option<Value>,
    #[serde(default)]
    pub is_visible: Option<Value>,
    #[serde(default)]
    pub feature_name: Option<String>,
    #[serde(default)]
    pub feature_address: Option<String>,
}

/// Acknowledgement of a stored toggle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToggleAck {
    pub status: &'static str,
    pub message: String,
    pub feature_index: usize,
    pub is_visible: bool,
}

impl ToggleAck {
    fn new(feature_index: usize, is_visible: bool) -> Self {
        Self {
            status: "success",
            message: format!("Feature {} visibility updated", feature_index),
            feature_index,
            is_visible,
        }
    }
}

/// Write-path handler for feature overrides
#[derive(Clone)]
pub struct ToggleHandler {
    layers: Arc<dyn CollectionStore>,
    overrides: Arc<dyn OverrideStore>,
}

impl ToggleHandler {
    pub fn new(layers: Arc<dyn CollectionStore>, overrides: Arc<dyn OverrideStore>) -> Self {
        Self { layers, overrides }
    }

    /// Use one catalog for layers and overrides
    pub fn from_catalog<C>(catalog: Arc<C>) -> Self
    where
        C: CollectionStore + OverrideStore + 'static,
    {
        Self::new(catalog.clone(), catalog)
    }

    /// Validate a raw request and apply it
    pub fn handle(&self, layer_id: LayerId, request: ToggleRequest) -> EngineResult<ToggleAck> {
        let outcome = parse_feature_index(request.feature_index.as_ref()).and_then(|index| {
            let visible = parse_visible(request.is_visible.as_ref())?;
            let display = CachedDisplay {
                name: request.feature_name,
                address: request.feature_address,
            };
            self.apply(layer_id, index, visible, display)
        });

        if let Err(ref err) = outcome {
            warn!(
                event = %Event::ToggleFailed,
                layer_id = %layer_id,
                error = %err,
                "feature toggle rejected"
            );
        }
        outcome
    }

    /// Set the visibility of feature `feature_index` in `layer_id`
    pub fn set_feature_visibility(
        &self,
        layer_id: LayerId,
        feature_index: usize,
        visible: bool,
    ) -> EngineResult<ToggleAck> {
        self.apply(layer_id, feature_index, visible, CachedDisplay::default())
    }

    fn apply(
        &self,
        layer_id: LayerId,
        feature_index: usize,
        visible: bool,
        display: CachedDisplay,
    ) -> EngineResult<ToggleAck> {
        self.layers.get_layer(layer_id).map_err(|e| store_error(layer_id, e))?;

        let (_, outcome) = self
            .overrides
            .upsert_override(layer_id, feature_index, visible, display)
            .map_err(|e| store_error(layer_id, e))?;

        info!(
            event = %Event::FeatureToggled,
            layer_id = %layer_id,
            feature_index,
            is_visible = visible,
            outcome = ?outcome,
            "feature visibility updated"
        );
        Ok(ToggleAck::new(feature_index, visible))
    }
}

fn store_error(layer_id: LayerId, err: CatalogError) -> EngineError {
    match err {
        CatalogError::LayerNotFound(_) => EngineError::UnknownLayer(layer_id),
        other => EngineError::ToggleStore(other.to_string()),
    }
}

/// A feature index is a non-negative integer, or a decimal string of one
pub fn parse_feature_index(value: Option<&Value>) -> EngineResult<usize> {
    let invalid = || EngineError::validation("feature_index must be a non-negative integer");

    match value {
        None | Some(Value::Null) => Err(EngineError::validation("feature_index is required")),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(invalid),
        Some(Value::String(s)) => s.trim().parse::<usize>().map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}

/// Visibility defaults to `true`; accepts booleans and "true"/"false" strings
pub fn parse_visible(value: Option<&Value>) -> EngineResult<bool> {
    match value {
        None | Some(Value::Null) => Ok(true),
        Some(Value::Bool(b)) => Ok(*b),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(EngineError::validation("is_visible must be a boolean")),
        },
        Some(_) => Err(EngineError::validation("is_visible must be a boolean")),
    }
}
