//! Helpers for the opaque key/value payloads pushed by the controller service
//!
//! Settings, state and session payloads are kept as JSON objects. These
//! helpers read them leniently: a missing or oddly shaped field falls back
//! to a safe default instead of failing.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// An opaque key/value payload
pub type ValueMap = Map<String, Value>;

/// Apply `f` to every value of a flat map, producing a new map with the
/// same keys.
pub fn map_values<K, V, U, F>(map: &BTreeMap<K, V>, mut f: F) -> BTreeMap<K, U>
where
    K: Ord + Clone,
    F: FnMut(&V) -> U,
{
    map.iter().map(|(k, v)| (k.clone(), f(v))).collect()
}

/// Normalize an optional value to a list.
///
/// Absent or null values become an empty list, arrays are returned as is,
/// and any other value becomes a one-element list.
pub fn ensure_array(value: Option<&Value>) -> Vec<Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.clone(),
        Some(other) => vec![other.clone()],
    }
}

/// Borrow a nested object by key
pub fn sub_map<'a>(map: &'a ValueMap, key: &str) -> Option<&'a ValueMap> {
    map.get(key).and_then(Value::as_object)
}

/// Read a non-empty string field
pub fn non_empty_str<'a>(map: &'a ValueMap, key: &str) -> Option<&'a str> {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Render a scalar as display text.
///
/// Strings are returned verbatim and numbers use their JSON text. Other
/// shapes have no display form.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Coerce a value to a number, treating anything non-numeric as zero.
pub fn coerce_number(value: Option<&Value>) -> f64 {
    let number = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(0.0)
            }
        }
        Some(Value::Bool(true)) => 1.0,
        _ => 0.0,
    };

    if number.is_nan() {
        0.0
    } else {
        number
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_map_values_keeps_keys() {
        let mut map = BTreeMap::new();
        map.insert("x", 1);
        map.insert("y", 2);

        let doubled = map_values(&map, |v| v * 2);
        assert_eq!(doubled.get("x"), Some(&2));
        assert_eq!(doubled.get("y"), Some(&4));
        assert_eq!(doubled.len(), 2);
    }

    #[test]
    fn test_ensure_array() {
        assert!(ensure_array(None).is_empty());
        assert!(ensure_array(Some(&Value::Null)).is_empty());
        assert_eq!(ensure_array(Some(&json!(["Grbl", "TinyG"]))).len(), 2);
        assert_eq!(ensure_array(Some(&json!(250000))), vec![json!(250000)]);
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(Some(&json!(1))), 1.0);
        assert_eq!(coerce_number(Some(&json!("1"))), 1.0);
        assert_eq!(coerce_number(Some(&json!(" 0 "))), 0.0);
        assert_eq!(coerce_number(Some(&json!("inch"))), 0.0);
        assert_eq!(coerce_number(Some(&json!(""))), 0.0);
        assert_eq!(coerce_number(Some(&json!(true))), 1.0);
        assert_eq!(coerce_number(Some(&json!({"a": 1}))), 0.0);
        assert_eq!(coerce_number(None), 0.0);
    }

    #[test]
    fn test_scalar_text() {
        assert_eq!(scalar_text(&json!("1.500")), Some("1.500".to_string()));
        assert_eq!(scalar_text(&json!(4)), Some("4".to_string()));
        assert_eq!(scalar_text(&json!(null)), None);
        assert_eq!(scalar_text(&json!([1])), None);
    }

    #[test]
    fn test_nested_lookups() {
        let value = json!({"modal": {"wcs": "G55", "units": ""}});
        let map = value.as_object().unwrap();
        let modal = sub_map(map, "modal").unwrap();
        assert_eq!(non_empty_str(modal, "wcs"), Some("G55"));
        assert_eq!(non_empty_str(modal, "units"), None);
        assert!(sub_map(map, "status").is_none());
    }
}
