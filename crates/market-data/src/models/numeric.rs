//! Boundary coercion for numeric fields.
//!
//! Providers encode numbers as JSON numbers, numeric strings ("123.45"),
//! or placeholders ("None", "-", ""). Everything is coerced to `f64`/`u64`
//! here so that no string ever reaches a canonical record.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

const PLACEHOLDERS: &[&str] = &["", "none", "null", "-", "n/a", "nan"];

/// Parse a provider string into a finite `f64`.
///
/// ```
/// use finagent_market_data::models::parse_f64;
///
/// assert_eq!(parse_f64("123.45"), Some(123.45));
/// assert_eq!(parse_f64(" 1e3 "), Some(1000.0));
/// assert_eq!(parse_f64("None"), None);
/// ```
pub fn parse_f64(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if PLACEHOLDERS.contains(&trimmed.to_ascii_lowercase().as_str()) {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a provider string into a `u64`; fractional volumes are rounded.
pub fn parse_u64(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    trimmed
        .parse::<u64>()
        .ok()
        .or_else(|| parse_f64(trimmed).and_then(f64_to_u64))
}

pub(crate) fn f64_to_u64(value: f64) -> Option<u64> {
    if value.is_finite() && value >= 0.0 && value <= u64::MAX as f64 {
        Some(value.round() as u64)
    } else {
        None
    }
}

/// Coerce an arbitrary JSON value to `f64`.
pub fn coerce_f64(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        serde_json::Value::String(s) => parse_f64(s),
        _ => None,
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

impl RawNumber {
    fn into_f64(self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(v).filter(|v| v.is_finite()),
            Self::Text(s) => parse_f64(&s),
            Self::Other(_) => None,
        }
    }
}

/// `deserialize_with` helper: number, numeric string, null or junk -> `Option<f64>`.
///
/// Pair with `#[serde(default)]` so that a missing field is also `None`.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawNumber>::deserialize(deserializer)?;
    Ok(raw.and_then(RawNumber::into_f64))
}

/// `deserialize_with` helper for counts such as volume.
pub fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawNumber>::deserialize(deserializer)?;
    Ok(raw.and_then(RawNumber::into_f64).and_then(f64_to_u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Payload {
        #[serde(default, deserialize_with = "lenient_f64")]
        price: Option<f64>,
        #[serde(default, deserialize_with = "lenient_u64")]
        volume: Option<u64>,
    }

    #[test]
    fn test_numeric_string_becomes_float() {
        let payload: Payload = serde_json::from_value(json!({ "price": "123.45" })).unwrap();
        assert_eq!(payload.price, Some(123.45));
    }

    #[test]
    fn test_typed_numbers_pass_through() {
        let payload: Payload =
            serde_json::from_value(json!({ "price": 99, "volume": 1_200_000 })).unwrap();
        assert_eq!(payload.price, Some(99.0));
        assert_eq!(payload.volume, Some(1_200_000));
    }

    #[test]
    fn test_placeholders_and_missing_become_none() {
        let payload: Payload =
            serde_json::from_value(json!({ "price": "None", "volume": null })).unwrap();
        assert_eq!(payload.price, None);
        assert_eq!(payload.volume, None);

        let payload: Payload = serde_json::from_value(json!({})).unwrap();
        assert_eq!(payload.price, None);

        let payload: Payload = serde_json::from_value(json!({ "price": { "raw": 1 } })).unwrap();
        assert_eq!(payload.price, None);
    }

    #[test]
    fn test_volume_string_parses() {
        assert_eq!(parse_u64("52345123"), Some(52_345_123));
        assert_eq!(parse_u64("1500.6"), Some(1501));
        assert_eq!(parse_u64("-3"), None);
    }

    #[test]
    fn test_coerce_json_values() {
        assert_eq!(coerce_f64(&json!("42.5")), Some(42.5));
        assert_eq!(coerce_f64(&json!(7)), Some(7.0));
        assert_eq!(coerce_f64(&json!(true)), None);
    }
}
