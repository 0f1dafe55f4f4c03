//! Lenient deserialization primitives.
//!
//! Dialects are perpetually partially non-conformant, so shape failures are
//! handled field by field: a field that doesn't match its declared shape is
//! replaced by its default, and an invalid element inside a collection is
//! dropped without failing the rest. Only transport-level failures are ever
//! surfaced to callers.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::entities::Entity;

/// Field-level fallback: deserialize `T`, substituting `T::default()` when
/// the wire value doesn't match.
///
/// Use with `#[serde(default, deserialize_with = "lenient")]` so that both
/// absent and malformed fields degrade to the default.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Filtered array: each element validates independently and invalid
/// elements are dropped, preserving the order of the survivors. A value
/// that isn't an array at all degrades to the empty vec.
pub fn filtered<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Array(elements) => Ok(elements
            .into_iter()
            .filter_map(|element| serde_json::from_value(element).ok())
            .collect()),
        _ => Ok(Vec::new()),
    }
}

/// Parse one entity from a raw payload value, `None` when the payload is
/// not an object or misses its discriminator. Runs the entity's
/// preprocessing rewrite before structural validation.
pub fn parse_entity<T: Entity>(value: Value) -> Option<T> {
    T::from_value(value)
}

/// Parse a payload that should be an array of entities, applying the
/// filtered-array policy. Anything other than an array yields the empty
/// vec.
pub fn parse_entities<T: Entity>(value: Value) -> Vec<T> {
    match value {
        Value::Array(elements) => elements.into_iter().filter_map(T::from_value).collect(),
        _ => Vec::new(),
    }
}

/// Coerce string-or-number wire values into `Option<String>`. Some dialects
/// serialize ids and counters inconsistently.
pub fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Probe {
        #[serde(default, deserialize_with = "lenient")]
        count: u64,
        #[serde(default, deserialize_with = "lenient")]
        label: String,
    }

    #[test]
    fn malformed_field_degrades_to_default() {
        let probe: Probe =
            serde_json::from_value(json!({ "count": "not a number", "label": 7 })).unwrap();
        assert_eq!(probe, Probe { count: 0, label: String::new() });
    }

    #[test]
    fn absent_field_degrades_to_default() {
        let probe: Probe = serde_json::from_value(json!({})).unwrap();
        assert_eq!(probe.count, 0);
    }

    #[test]
    fn filtered_drops_invalid_elements_in_order() {
        #[derive(Debug, Deserialize)]
        struct Wrap {
            #[serde(default, deserialize_with = "filtered")]
            items: Vec<u64>,
        }
        let wrap: Wrap =
            serde_json::from_value(json!({ "items": [1, "bad", 2, null, 3] })).unwrap();
        assert_eq!(wrap.items, vec![1, 2, 3]);
    }

    #[test]
    fn filtered_non_array_is_empty() {
        #[derive(Debug, Deserialize)]
        struct Wrap {
            #[serde(default, deserialize_with = "filtered")]
            items: Vec<u64>,
        }
        let wrap: Wrap = serde_json::from_value(json!({ "items": "nope" })).unwrap();
        assert!(wrap.items.is_empty());
    }

    #[test]
    fn lenient_id_accepts_numbers() {
        #[derive(Debug, Deserialize)]
        struct Wrap {
            #[serde(default, deserialize_with = "lenient_id")]
            id: Option<String>,
        }
        let wrap: Wrap = serde_json::from_value(json!({ "id": 42 })).unwrap();
        assert_eq!(wrap.id.as_deref(), Some("42"));
    }
}
