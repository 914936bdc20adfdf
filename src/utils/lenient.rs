//! Forgiving `deserialize_with` helpers for generator output, which drifts
//! between strings, numbers, arrays and objects for the same field.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Render a scalar as text; objects fall back to their `name` field
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.trim().to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map.get("name").and_then(scalar_text),
        Value::Array(_) => None,
    }
}

fn flatten_strings(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Array(items) => {
            for item in items {
                if let Some(text) = scalar_text(item) {
                    out.push(text);
                }
            }
        }
        // {"do": [...], "dont": [...]} and similar groupings
        Value::Object(map) if !map.contains_key("name") => {
            for nested in map.values() {
                flatten_strings(nested, out);
            }
        }
        other => {
            if let Some(text) = scalar_text(other) {
                out.push(text);
            }
        }
    }
}

pub fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_text(&value).unwrap_or_default())
}

pub fn optional_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_text(&value).filter(|s| !s.is_empty()))
}

pub fn string_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let mut out = Vec::new();
    flatten_strings(&value, &mut out);
    out.retain(|s| !s.is_empty());
    Ok(out)
}

/// A list of records where malformed entries are dropped instead of
/// failing the whole response
pub fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let items = match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        single @ Value::Object(_) => vec![single],
        _ => Vec::new(),
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}
