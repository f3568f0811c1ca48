//! # Raw Feature Collections
//!
//! Collections are stored as GeoJSON documents. Features are kept opaque:
//! geometry and properties pass through to the map untouched, and nothing
//! here validates or reprojects coordinates.

use serde_json::Value;

use super::backend::SourceBackend;
use super::errors::{SourceError, SourceResult};

/// The ordered feature sequence of one source document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFeatureCollection {
    pub features: Vec<Value>,
}

impl RawFeatureCollection {
    /// Parse a document: a JSON object whose `features` member is an array
    pub fn parse(bytes: &[u8]) -> SourceResult<Self> {
        let document: Value = serde_json::from_slice(bytes)
            .map_err(|e| SourceError::Malformed(format!("invalid JSON: {}", e)))?;
        Self::from_value(document)
    }

    pub fn from_value(document: Value) -> SourceResult<Self> {
        let mut object = match document {
            Value::Object(object) => object,
            other => {
                return Err(SourceError::Malformed(format!(
                    "expected an object, found {}",
                    json_kind(&other)
                )))
            }
        };

        match object.remove("features") {
            Some(Value::Array(features)) => Ok(Self { features }),
            Some(other) => Err(SourceError::Malformed(format!(
                "'features' must be an array, found {}",
                json_kind(&other)
            ))),
            None => Err(SourceError::Malformed("missing 'features' member".into())),
        }
    }

    /// Read and parse the document at `path`
    pub fn load(backend: &dyn SourceBackend, path: &str) -> SourceResult<Self> {
        let bytes = backend.read(path)?;
        Self::parse(&bytes)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// The `properties` member of a feature, if the feature is an object
pub fn feature_properties(feature: &Value) -> Option<&Value> {
    feature.as_object().and_then(|f| f.get("properties"))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemoryBackend;
    use serde_json::json;

    #[test]
    fn test_parse_feature_collection() {
        let doc = json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}, "properties": {"name": "A"}},
                {"type": "Feature", "geometry": null, "properties": null}
            ]
        });
        let parsed = RawFeatureCollection::parse(doc.to_string().as_bytes()).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed.features[0]["properties"]["name"], "A");
    }

    #[test]
    fn test_type_member_is_not_required() {
        let parsed = RawFeatureCollection::parse(br#"{"features": []}"#).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_malformed_documents() {
        let docs: [&[u8]; 5] = [b"not json", b"[]", b"{}", br#"{"features": {}}"#, b"null"];
        for doc in docs {
            let result = RawFeatureCollection::parse(doc);
            assert!(matches!(result, Err(SourceError::Malformed(_))), "{:?}", doc);
        }
    }

    #[test]
    fn test_load_missing_source() {
        let backend = MemoryBackend::new();
        let result = RawFeatureCollection::load(&backend, "gone.geojson");
        assert!(matches!(result, Err(SourceError::NotFound(_))));
    }

    #[test]
    fn test_feature_properties() {
        assert_eq!(feature_properties(&json!({"properties": {"a": 1}})), Some(&json!({"a": 1})));
        assert_eq!(feature_properties(&json!("not a feature")), None);
        assert_eq!(feature_properties(&json!({"geometry": null})), None);
    }
}
