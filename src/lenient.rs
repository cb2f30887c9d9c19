//! Tolerant field deserializers
//!
//! Provider payloads and stored collections are not under our control. A leaf of an
//! unexpected type must cost only that leaf, never the surrounding record, so these helpers
//! decode through [`serde_json::Value`] and map any mismatch to "absent".

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use uuid::Uuid;

/// Decode a field as `T`, or `None` when it has any other shape.
pub(crate) fn or_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

/// Decode a field as `T`, falling back to `T::default()` on any other shape.
pub(crate) fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(or_none(deserializer)?.unwrap_or_default())
}

/// Decode an array element by element, dropping elements that do not fit `T`.
/// Anything other than an array reads as `None`.
pub(crate) fn list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(Some(
            items
                .into_iter()
                .filter_map(|item| T::deserialize(item).ok())
                .collect(),
        )),
        _ => Ok(None),
    }
}

/// [`list`], with anything other than an array reading as empty.
pub(crate) fn list_or_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(list(deserializer)?.unwrap_or_default())
}

fn text_of(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Text leaf; scalar numbers and booleans are rendered as text.
pub(crate) fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text_of(Value::deserialize(deserializer)?))
}

/// Array of text leaves; non-scalar elements are dropped.
pub(crate) fn text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items.into_iter().filter_map(text_of).collect()),
        _ => Ok(Vec::new()),
    }
}

/// Required identifier: a string, or a number rendered as text.
pub(crate) fn id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number id, got {}",
            other
        ))),
    }
}

fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

/// Numeric leaf; numeric strings are parsed.
pub(crate) fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number_of(&Value::deserialize(deserializer)?))
}

/// Whole-minute leaf. Integers pass through; fractional values round to the nearest minute.
pub(crate) fn minutes<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if let Some(n) = value.as_i64() {
        return Ok(Some(n));
    }
    Ok(number_of(&value)
        .map(f64::round)
        .filter(|n| *n >= i64::MIN as f64 && *n <= i64::MAX as f64)
        .map(|n| n as i64))
}

/// [`minutes`] narrowed to a non-negative `u32`.
pub(crate) fn minutes_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(minutes(deserializer)?.and_then(|n| u32::try_from(n).ok()))
}

/// Cast/crew entry identity; anything that is not a UUID gets a fresh one.
pub(crate) fn entry_id<'de, D>(deserializer: D) -> Result<Uuid, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(or_none(deserializer)?.unwrap_or_else(Uuid::new_v4))
}
