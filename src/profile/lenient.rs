//! Tolerant deserializers for backend payloads.
//!
//! The backend is loose about types: scalars arrive as strings, numbers or
//! booleans, and any field may be `null`. These helpers normalize instead of
//! rejecting the whole profile.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// `null` → `T::default()`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Any scalar → `String`; `null`, arrays and objects → empty string.
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_to_string(Value::deserialize(deserializer)?).unwrap_or_default())
}

/// Any scalar → `Some(String)`; `null` → `None`.
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_to_string(Value::deserialize(deserializer)?))
}

/// Booleans, `"true"`/`"yes"`/`"1"` (any case), and the number 1 → `true`;
/// anything else → `false`.
pub fn boolean<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::String(s) => {
            let s = s.trim();
            ["true", "yes", "1"].iter().any(|t| s.eq_ignore_ascii_case(t))
        }
        Value::Number(n) => n.as_f64() == Some(1.0),
        _ => false,
    })
}

/// Non-negative integers or numeric strings → `Some(u32)`.
pub fn opt_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
