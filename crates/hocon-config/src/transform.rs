//! Default conversions applied when a value is read as a different type.
//!
//! Strings convert to numbers and booleans, numbers and booleans convert
//! to strings, and an object with numeric keys converts to a list.
//! Anything else is returned unchanged and the caller reports the type
//! mismatch.

use crate::value::{Number, Value, ValueKind, ValueType};
use num_bigint::BigInt;

/// Convert `value` towards `requested` if a default conversion applies.
pub fn transform(value: &Value, requested: ValueType) -> Value {
    match (value.kind(), requested) {
        (ValueKind::String(s), ValueType::Number) => parse_number(s)
            .map(|number| Value::number(number, Some(s.clone()), value.origin().clone()))
            .unwrap_or_else(|| value.clone()),
        (ValueKind::String(s), ValueType::Boolean) => match s.as_str() {
            "true" | "yes" | "on" => Value::boolean(true, value.origin().clone()),
            "false" | "no" | "off" => Value::boolean(false, value.origin().clone()),
            _ => value.clone(),
        },
        (ValueKind::String(s), ValueType::Null) if s == "null" => {
            Value::null(value.origin().clone())
        }
        (ValueKind::Number { .. } | ValueKind::Boolean(_), ValueType::String) => value
            .transform_to_string()
            .map(|s| Value::string(s, value.origin().clone()))
            .unwrap_or_else(|| value.clone()),
        (ValueKind::Object { .. }, ValueType::List) => {
            object_to_list(value).unwrap_or_else(|| value.clone())
        }
        _ => value.clone(),
    }
}

/// Read an object with numeric keys (`{"0": a, "1": b}`) as a list.
///
/// Keys that are not non-negative integers are skipped and gaps are
/// closed up. `None` unless the value is a concrete object with at least
/// one numeric key.
pub(crate) fn object_to_list(value: &Value) -> Option<Value> {
    let entries = value.as_object()?;
    let mut indexed: Vec<(u64, &Value)> = entries
        .iter()
        .filter_map(|(key, v)| {
            if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            key.parse::<u64>().ok().map(|i| (i, v))
        })
        .collect();
    if indexed.is_empty() {
        return None;
    }
    indexed.sort_by_key(|(i, _)| *i);
    Some(Value::list(
        indexed.into_iter().map(|(_, v)| v.clone()).collect(),
        value.origin().clone(),
    ))
}

fn parse_number(s: &str) -> Option<Number> {
    let trimmed = s.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return Some(Number::Int(i));
    }
    let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        return trimmed.parse::<BigInt>().ok().map(Number::BigInt);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite())
        .map(Number::Double)
}
