//! # Feature Overrides
//!
//! A stored per-feature visibility exception. A feature without an override
//! inherits the default (visible).

use serde::{Deserialize, Serialize};

use super::collection::LayerId;

/// Visibility override for the feature at `feature_index` in a layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureOverride {
    pub layer_id: LayerId,
    pub feature_index: usize,
    pub is_visible: bool,
    #[serde(default)]
    pub feature_name: Option<String>,
    #[serde(default)]
    pub feature_address: Option<String>,
}

impl FeatureOverride {
    pub fn new(layer_id: LayerId, feature_index: usize, is_visible: bool) -> Self {
        Self {
            layer_id,
            feature_index,
            is_visible,
            feature_name: None,
            feature_address: None,
        }
    }
}

/// Cached display metadata carried along with a toggle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CachedDisplay {
    pub name: Option<String>,
    pub address: Option<String>,
}

/// Outcome of an upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}
