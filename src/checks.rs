//! Type checkers: pure predicates over raw JSON values.
//!
//! Every checker takes any [`Value`] and answers `true`/`false`. None of them
//! panic, whatever the input shape.

use std::borrow::Cow;

use serde_json::{Map, Value};

/// Best-effort numeric coercion: JSON numbers as-is, numeric strings parsed.
///
/// Blank strings, booleans, `null`, arrays and objects do not coerce.
fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            s.parse::<f64>().ok()
        }
        _ => None,
    }
}

/// Whole number after coercion (`7`, `"7"`, `7.0`, `"1e3"`).
pub fn is_integer(value: &Value) -> bool {
    if let Value::Number(n) = value {
        if n.is_i64() || n.is_u64() {
            return true;
        }
    }
    coerce_number(value)
        .map(|f| f.is_finite() && f.fract() == 0.0)
        .unwrap_or(false)
}

/// Finite number after coercion. `"NaN"` and `"inf"` are rejected.
pub fn is_number(value: &Value) -> bool {
    coerce_number(value).map(f64::is_finite).unwrap_or(false)
}

/// Already textual; no coercion.
pub fn is_string(value: &Value) -> bool {
    value.is_string()
}

/// Canonical dash-separated UUID text (`xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`).
pub fn is_uuid(value: &Value) -> bool {
    match value.as_str() {
        // 36 chars is the hyphenated form only; simple, braced and urn forms differ in length
        Some(s) => s.len() == 36 && uuid::Uuid::try_parse(s).is_ok(),
        None => false,
    }
}

/// Interpret a value as a key/value mapping.
///
/// Mappings are borrowed; strings are parsed as JSON and accepted only when
/// they hold a mapping. Everything else yields `None`.
pub fn as_object(value: &Value) -> Option<Cow<'_, Map<String, Value>>> {
    match value {
        Value::Object(map) => Some(Cow::Borrowed(map)),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Object(map)) => Some(Cow::Owned(map)),
            _ => None,
        },
        _ => None,
    }
}

/// A mapping, or a string holding a JSON mapping.
pub fn is_object(value: &Value) -> bool {
    as_object(value).is_some()
}

fn is_array_of(value: &Value, check: fn(&Value) -> bool) -> bool {
    match value {
        Value::Array(items) => items.iter().all(check),
        _ => false,
    }
}

/// Sequence of strings; empty is valid.
pub fn is_array_of_strings(value: &Value) -> bool {
    is_array_of(value, is_string)
}

/// Sequence of UUID strings; empty is valid.
pub fn is_array_of_uuid(value: &Value) -> bool {
    is_array_of(value, is_uuid)
}

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Text parseable as a calendar date or date-time.
///
/// Accepts RFC 3339 / ISO 8601 date-times (with or without offset), plain
/// `YYYY-MM-DD` dates and RFC 2822 date-times.
pub fn is_iso_string(value: &Value) -> bool {
    let s = match value.as_str() {
        Some(s) => s.trim(),
        None => return false,
    };
    if chrono::DateTime::parse_from_rfc3339(s).is_ok() {
        return true;
    }
    if NAIVE_DATETIME_FORMATS
        .iter()
        .any(|fmt| chrono::NaiveDateTime::parse_from_str(s, fmt).is_ok())
    {
        return true;
    }
    if chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok() {
        return true;
    }
    chrono::DateTime::parse_from_rfc2822(s).is_ok()
}

/// Native boolean; `"true"`/`"false"` strings are not booleans.
pub fn is_boolean(value: &Value) -> bool {
    value.is_boolean()
}
