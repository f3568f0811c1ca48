//! # Map Data Views
//!
//! The read-path payload. Field names are the wire contract of the map
//! client and layer-control UI.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::catalog::LayerId;

/// GeoJSON `type` of the rendered sub-collection
pub const FEATURE_COLLECTION: &str = "FeatureCollection";

/// Per-feature entry for the layer-control list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureDetail {
    pub index: usize,
    pub name: String,
    pub address: String,
    /// The feature's own visibility, ignoring the layer flag
    pub is_visible: bool,
}

/// Features the map should draw for one layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedCollection {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub features: Vec<Value>,
}

impl RenderedCollection {
    pub fn new(features: Vec<Value>) -> Self {
        Self {
            kind: FEATURE_COLLECTION,
            features,
        }
    }
}

/// One layer as the client sees it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerView {
    pub id: LayerId,
    pub name: String,
    pub color: String,
    /// Resolved symbol URL
    pub symbol: Option<String>,
    pub is_visible: bool,
    /// Length of the raw feature sequence
    pub feature_count: usize,
    pub features: Vec<FeatureDetail>,
    pub geojson: RenderedCollection,
}

/// The complete read-path response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapData {
    pub layers: Vec<LayerView>,
    /// Serialized as RFC 3339, or `null` for an empty store
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_info: Option<String>,
}

impl MapData {
    pub fn new(layers: Vec<LayerView>, last_updated: Option<DateTime<Utc>>) -> Self {
        Self {
            layers,
            last_updated,
            error: None,
            debug_info: None,
        }
    }

    /// Structurally valid empty payload carrying an error description
    pub fn failed(error: impl Into<String>, debug_info: Option<String>) -> Self {
        Self {
            layers: Vec::new(),
            last_updated: None,
            error: Some(error.into()),
            debug_info,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }

    /// Drop debug detail unless the caller may see it
    pub fn redact_debug(mut self, expose: bool) -> Self {
        if !expose {
            self.debug_info = None;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_empty_serialization() {
        let value = serde_json::to_value(MapData::new(Vec::new(), None)).unwrap();
        assert_eq!(value, json!({"layers": [], "last_updated": null}));
    }

    #[test]
    fn test_failed_payload_shape() {
        let value = serde_json::to_value(MapData::failed("boom", None)).unwrap();
        assert_eq!(value, json!({"layers": [], "last_updated": null, "error": "boom"}));
    }

    #[test]
    fn test_last_updated_is_iso8601() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 9, 14, 30, 0).unwrap();
        let value = serde_json::to_value(MapData::new(Vec::new(), Some(ts))).unwrap();
        assert_eq!(value["last_updated"], "2024-03-09T14:30:00Z");
    }

    #[test]
    fn test_layer_view_wire_names() {
        let view = LayerView {
            id: LayerId::new(7),
            name: "Parks".into(),
            color: "#00ff00".into(),
            symbol: None,
            is_visible: true,
            feature_count: 1,
            features: vec![FeatureDetail {
                index: 0,
                name: "Central".into(),
                address: String::new(),
                is_visible: true,
            }],
            geojson: RenderedCollection::new(vec![json!({"type": "Feature"})]),
        };
        let value = serde_json::to_value(view).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["feature_count"], 1);
        assert_eq!(value["features"][0]["is_visible"], true);
        assert_eq!(value["geojson"]["type"], "FeatureCollection");
    }

    #[test]
    fn test_redact_debug() {
        let data = MapData::failed("boom", Some("detail".into()));
        assert_eq!(data.clone().redact_debug(true).debug_info.as_deref(), Some("detail"));
        assert_eq!(data.redact_debug(false).debug_info, None);
    }
}
