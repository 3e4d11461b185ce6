//! Conversion between value trees and `serde_json` values.

use crate::error::ConfigError;
use crate::value::{Number, Value, ValueKind};
use hocon_origin::Origin;
use num_bigint::BigInt;
use num_traits::ToPrimitive;

/// Build a value tree from parsed JSON. Every node gets `origin`.
///
/// Numbers keep their JSON text; integers beyond `i64` become big
/// integers.
pub fn from_json(json: serde_json::Value, origin: Origin) -> Value {
    match json {
        serde_json::Value::Null => Value::null(origin),
        serde_json::Value::Bool(b) => Value::boolean(b, origin),
        serde_json::Value::Number(n) => {
            let original = n.to_string();
            let number = if let Some(i) = n.as_i64() {
                Number::Int(i)
            } else if let Some(u) = n.as_u64() {
                Number::BigInt(BigInt::from(u))
            } else {
                Number::Double(n.as_f64().unwrap_or(f64::NAN))
            };
            Value::number(number, Some(original), origin)
        }
        serde_json::Value::String(s) => Value::string(s, origin),
        serde_json::Value::Array(items) => {
            let items = items
                .into_iter()
                .map(|item| from_json(item, origin.clone()))
                .collect();
            Value::list(items, origin)
        }
        serde_json::Value::Object(map) => {
            let entries = map
                .into_iter()
                .map(|(k, v)| (k, from_json(v, origin.clone())))
                .collect();
            Value::object(entries, origin)
        }
    }
}

/// Parse JSON text into a value tree.
pub fn parse_json(text: &str, origin_name: &str) -> Result<Value, ConfigError> {
    let json: serde_json::Value = serde_json::from_str(text).map_err(|e| ConfigError::BadValue {
        path: origin_name.to_string(),
        message: format!("invalid JSON: {e}"),
        origin: Some(Origin::file(origin_name).with_line(e.line())),
    })?;
    Ok(from_json(json, Origin::file(origin_name)))
}

/// Convert a resolved value tree to JSON.
pub fn to_json(value: &Value) -> Result<serde_json::Value, ConfigError> {
    let json = match value.kind() {
        ValueKind::Null => serde_json::Value::Null,
        ValueKind::Boolean(b) => serde_json::Value::Bool(*b),
        ValueKind::Number { number, .. } => number_to_json(number),
        ValueKind::String(s) => serde_json::Value::String(s.clone()),
        ValueKind::List(items) => {
            serde_json::Value::Array(items.iter().map(to_json).collect::<Result<_, _>>()?)
        }
        ValueKind::Object { entries, .. } => serde_json::Value::Object(
            entries
                .iter()
                .map(|(k, v)| Ok((k.clone(), to_json(v)?)))
                .collect::<Result<_, ConfigError>>()?,
        ),
        _ => {
            return Err(ConfigError::NotResolved {
                path: None,
                message: format!("Cannot convert an unresolved {} to JSON", value.value_type()),
                origin: Some(value.origin().clone()),
            });
        }
    };
    Ok(json)
}

fn number_to_json(number: &Number) -> serde_json::Value {
    let as_double = |d: f64| {
        serde_json::Number::from_f64(d)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    };
    match number {
        Number::Int(i) => serde_json::Value::from(*i),
        Number::Double(d) => as_double(*d),
        Number::BigInt(b) => {
            if let Some(i) = b.to_i64() {
                serde_json::Value::from(i)
            } else if let Some(u) = b.to_u64() {
                serde_json::Value::from(u)
            } else {
                as_double(number.to_f64())
            }
        }
    }
}
