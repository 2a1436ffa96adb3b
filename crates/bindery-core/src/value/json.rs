//! Lossless-enough interop with decoded JSON, the most common raw-input
//! source.

use super::Value;
use bindery_schema::DEFAULT_DATE_FORMAT;
use serde_json::{Map, Number, Value as Json};

/// Convert decoded JSON into the engine value model. Integral numbers become
/// `Int`, everything else numeric becomes `Float`; object key order is
/// preserved when `serde_json` is built with ordered maps, otherwise it is
/// whatever the decoder produced.
#[must_use]
pub fn from_json(json: &Json) -> Value {
    match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => n.as_i64().map_or_else(
            || Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            Value::Int,
        ),
        Json::String(s) => Value::Text(s.clone()),
        Json::Array(items) => Value::List(items.iter().map(from_json).collect()),
        Json::Object(entries) => Value::Map(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), from_json(v)))
                .collect(),
        ),
    }
}

/// Convert a plain value back to JSON. Dates are rendered with the default
/// date format; serializer output has already formatted date fields with
/// their per-field output format, so this path only covers raw `Date`
/// values.
#[must_use]
pub fn to_json(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(i) => Json::Number(Number::from(*i)),
        Value::Float(f) => Number::from_f64(*f).map_or(Json::Null, Json::Number),
        Value::Text(s) => Json::String(s.clone()),
        Value::Date(d) => {
            let text = crate::date::cached_format(DEFAULT_DATE_FORMAT)
                .ok()
                .and_then(|format| d.format(&*format).ok())
                .unwrap_or_else(|| d.to_string());
            Json::String(text)
        }
        Value::List(items) => Json::Array(items.iter().map(to_json).collect()),
        Value::Map(entries) => {
            let mut map = Map::new();
            for (k, v) in entries {
                map.insert(k.clone(), to_json(v));
            }
            Json::Object(map)
        }
    }
}
