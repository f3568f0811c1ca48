//! # Display-Field Resolver
//!
//! Extracts a human-readable name and address from an arbitrary feature
//! `properties` value. The candidate keys are fixed and ordered; the first
//! key holding a truthy value wins and values from different keys are never
//! merged.
//!
//! Resolution is total: any JSON value (including `null`, non-objects and
//! deeply nested junk) yields a result.

use serde::Serialize;
use serde_json::{Map, Value};

/// Property keys tried, in order, for a feature's name
pub const NAME_KEYS: [&str; 7] = ["name", "Name", "NAME", "ten", "tên", "title", "Title"];

/// Property keys tried, in order, for a feature's address
pub const ADDRESS_KEYS: [&str; 8] = [
    "display_name",
    "address",
    "Address",
    "ADDRESS",
    "dia_chi",
    "địa chỉ",
    "location",
    "Location",
];

/// Resolved display metadata of one feature
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayFields {
    pub name: String,
    pub address: String,
}

/// Resolve the name and address of the feature at `index`.
///
/// `properties` is the feature's `properties` member, if it has one.
pub fn resolve_display(properties: Option<&Value>, index: usize) -> DisplayFields {
    let props = properties.and_then(Value::as_object);

    let name = props
        .and_then(|p| first_truthy(p, &NAME_KEYS))
        .map(coerce_to_string)
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| fallback_name(index));

    let address = props
        .and_then(|p| first_truthy(p, &ADDRESS_KEYS))
        .map(format_address)
        .unwrap_or_default();

    DisplayFields { name, address }
}

/// Name used when no candidate key matches: 1-based position
pub fn fallback_name(index: usize) -> String {
    format!("Location #{}", index + 1)
}

fn first_truthy<'a>(props: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| props.get(*key))
        .find(|value| is_truthy(value))
}

/// Structured addresses prefer `full_address`, else
/// `street, postal_code city, country` with empty parts dropped.
fn format_address(value: &Value) -> String {
    let object = match value {
        Value::String(s) => return s.clone(),
        Value::Object(object) => object,
        other => return coerce_to_string(other),
    };

    if let Some(full) = object.get("full_address").filter(|v| is_truthy(v)) {
        return coerce_to_string(full);
    }

    let part = |key: &str| {
        object
            .get(key)
            .filter(|v| is_truthy(v))
            .map(coerce_to_string)
    };

    let mut parts = Vec::with_capacity(3);
    if let Some(street) = part("street") {
        parts.push(street);
    }
    let locality: Vec<String> = ["postal_code", "city"].iter().filter_map(|k| part(k)).collect();
    if !locality.is_empty() {
        parts.push(locality.join(" "));
    }
    if let Some(country) = part("country") {
        parts.push(country);
    }
    parts.join(", ")
}

/// Empty strings, `null`, `false`, zero and empty containers are falsy
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Strings verbatim, everything else as its JSON text
fn coerce_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resolve(props: Value, index: usize) -> DisplayFields {
        resolve_display(Some(&props), index)
    }

    #[test]
    fn test_name_key_order() {
        let fields = resolve(json!({"title": "Title wins last", "Name": "Name wins", "NAME": "upper"}), 0);
        assert_eq!(fields.name, "Name wins");
    }

    #[test]
    fn test_empty_name_falls_through_to_next_key() {
        let fields = resolve(json!({"name": "", "title": "Harbor"}), 0);
        assert_eq!(fields.name, "Harbor");
    }

    #[test]
    fn test_localized_name_key() {
        let fields = resolve(json!({"tên": "Chợ Bến Thành"}), 0);
        assert_eq!(fields.name, "Chợ Bến Thành");
    }

    #[test]
    fn test_missing_name_uses_one_based_fallback() {
        assert_eq!(resolve(json!({}), 0).name, "Location #1");
        assert_eq!(resolve(json!({"other": "x"}), 41).name, "Location #42");
    }

    #[test]
    fn test_non_string_name_is_coerced() {
        assert_eq!(resolve(json!({"name": 1204}), 0).name, "1204");
    }

    #[test]
    fn test_string_address_verbatim() {
        let fields = resolve(json!({"address": "12 Rue de la Paix, Paris"}), 0);
        assert_eq!(fields.address, "12 Rue de la Paix, Paris");
    }

    #[test]
    fn test_display_name_preferred_over_address() {
        let fields = resolve(json!({"address": "short", "display_name": "long form"}), 0);
        assert_eq!(fields.address, "long form");
    }

    #[test]
    fn test_structured_address_without_postal_code() {
        let fields = resolve(
            json!({"address": {"street": "Main St", "city": "Springfield", "country": "US"}}),
            0,
        );
        assert_eq!(fields.address, "Main St, Springfield, US");
    }

    #[test]
    fn test_structured_address_with_postal_code() {
        let fields = resolve(
            json!({"Address": {"street": "Hauptstr. 5", "postal_code": "10115", "city": "Berlin", "country": "DE"}}),
            0,
        );
        assert_eq!(fields.address, "Hauptstr. 5, 10115 Berlin, DE");
    }

    #[test]
    fn test_structured_address_postal_code_only() {
        let fields = resolve(json!({"location": {"postal_code": "75001"}}), 0);
        assert_eq!(fields.address, "75001");
    }

    #[test]
    fn test_full_address_wins() {
        let fields = resolve(
            json!({"address": {"full_address": "1 Infinite Loop, Cupertino", "street": "ignored"}}),
            0,
        );
        assert_eq!(fields.address, "1 Infinite Loop, Cupertino");
    }

    #[test]
    fn test_empty_full_address_falls_back_to_parts() {
        let fields = resolve(json!({"address": {"full_address": "", "city": "Hanoi"}}), 0);
        assert_eq!(fields.address, "Hanoi");
    }

    #[test]
    fn test_first_matching_address_key_only() {
        // `address` matches first; `location` is never merged in
        let fields = resolve(json!({"address": {"street": "A St"}, "location": "elsewhere"}), 0);
        assert_eq!(fields.address, "A St");
    }

    #[test]
    fn test_other_address_shapes_are_coerced() {
        assert_eq!(resolve(json!({"address": 42}), 0).address, "42");
        assert_eq!(resolve(json!({"address": ["a", "b"]}), 0).address, r#"["a","b"]"#);
    }

    #[test]
    fn test_missing_address_is_empty() {
        assert_eq!(resolve(json!({"name": "x"}), 0).address, "");
    }

    #[test]
    fn test_never_fails_on_arbitrary_shapes() {
        let shapes = [
            Value::Null,
            json!({}),
            json!([]),
            json!("just a string"),
            json!(17),
            json!({"nested": {"deeper": {"name": "not at top level"}}}),
            json!({"name": null, "address": null}),
            json!({"name": {}, "address": {}}),
            json!({"address": {"street": null, "city": false}}),
        ];
        for (i, shape) in shapes.iter().enumerate() {
            let fields = resolve_display(Some(shape), i);
            assert_eq!(fields.name, format!("Location #{}", i + 1), "{:?}", shape);
            assert_eq!(fields.address, "", "{:?}", shape);
        }

        let absent = resolve_display(None, 2);
        assert_eq!(absent.name, "Location #3");
        assert_eq!(absent.address, "");
    }
}
