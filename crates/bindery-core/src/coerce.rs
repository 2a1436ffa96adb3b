//! Type coercion: raw values to canonical scalar, date, or structural
//! representations, driven by the resolved field schema.

use crate::{
    date::cached_format,
    error::{BindError, ErrorKind},
    value::Value,
};
use bindery_schema::{
    resolved::FieldSchema,
    types::{ArrayPolicy, ScalarType, TypeTag},
};
use time::PrimitiveDateTime;

/// Coerce a located raw value for one field. Array fields apply element-wise
/// coercion under the field's key policy. Class-typed elements pass through
/// unchanged; the accessor setter recurses into them.
pub fn coerce_field(value: Value, field: &FieldSchema) -> Result<Value, BindError> {
    if field.is_array {
        coerce_array(value, field)
    } else {
        coerce_single(value, field)
    }
}

fn coerce_single(value: Value, field: &FieldSchema) -> Result<Value, BindError> {
    match &field.ty {
        TypeTag::Scalar(tag) => coerce_scalar(value, *tag, &field.input_date_format),
        // deferred: the setter hydrates the nested class through its context
        TypeTag::Class(_) => Ok(value),
    }
}

fn coerce_array(value: Value, field: &FieldSchema) -> Result<Value, BindError> {
    match value {
        Value::List(items) => {
            let coerced = items
                .into_iter()
                .map(|item| coerce_single(item, field))
                .collect::<Result<Vec<_>, _>>()?;

            Ok(Value::List(coerced))
        }
        Value::Map(entries) => coerce_keyed(entries, field),
        other => Err(BindError::new(
            ErrorKind::TypeConversion,
            "",
            format!("expected list or map for array field, got {}", other.type_name()),
        )),
    }
}

/// Key policy for map-shaped array input: with `preserve_keys`, string keys
/// survive and numeric-string keys are re-indexed as list positions (unless
/// `preserve_only_string_keys` is off, which keeps numeric keys verbatim).
/// Without `preserve_keys`, keys are discarded and a list results.
fn coerce_keyed(
    entries: Vec<(String, Value)>,
    field: &FieldSchema,
) -> Result<Value, BindError> {
    let ArrayPolicy {
        preserve_keys,
        preserve_only_string_keys,
    } = field.array_policy;

    if !preserve_keys {
        let coerced = entries
            .into_iter()
            .map(|(_, v)| coerce_single(v, field))
            .collect::<Result<Vec<_>, _>>()?;

        return Ok(Value::List(coerced));
    }

    let mut out = Vec::with_capacity(entries.len());
    let mut next_index = 0usize;
    for (key, item) in entries {
        let key = if preserve_only_string_keys && key.parse::<usize>().is_ok() {
            let position = next_index.to_string();
            next_index += 1;
            position
        } else {
            key
        };
        out.push((key, coerce_single(item, field)?));
    }

    Ok(Value::Map(out))
}

/// Coerce one raw value to a canonical scalar. Narrowing follows the
/// declared tag, not the input shape; unconvertible input is a
/// `TypeConversion` error.
pub fn coerce_scalar(
    value: Value,
    tag: ScalarType,
    input_date_format: &str,
) -> Result<Value, BindError> {
    match tag {
        ScalarType::String => coerce_text(value),
        ScalarType::Integer => coerce_int(value),
        ScalarType::Float => coerce_float(value),
        ScalarType::Boolean => coerce_bool(value),
        ScalarType::Date => coerce_date(value, input_date_format),
        ScalarType::Array | ScalarType::Raw => Ok(value),
    }
}

fn coerce_text(value: Value) -> Result<Value, BindError> {
    let text = match value {
        Value::Text(s) => s,
        Value::Int(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Bool(b) => b.to_string(),
        other => return Err(conversion(&other, "string")),
    };

    Ok(Value::Text(text))
}

fn coerce_int(value: Value) -> Result<Value, BindError> {
    let int = match value {
        Value::Int(i) => i,
        Value::Float(f) => f as i64,
        Value::Bool(b) => i64::from(b),
        Value::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| conversion(&Value::Text(s.clone()), "integer"))?,
        other => return Err(conversion(&other, "integer")),
    };

    Ok(Value::Int(int))
}

fn coerce_float(value: Value) -> Result<Value, BindError> {
    let float = match value {
        Value::Float(f) => f,
        Value::Int(i) => i as f64,
        Value::Bool(b) => f64::from(u8::from(b)),
        Value::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| conversion(&Value::Text(s.clone()), "float"))?,
        other => return Err(conversion(&other, "float")),
    };

    Ok(Value::Float(float))
}

fn coerce_bool(value: Value) -> Result<Value, BindError> {
    let boolean = match value {
        Value::Bool(b) => b,
        Value::Int(0) => false,
        Value::Int(1) => true,
        Value::Text(s) => match s.as_str() {
            "true" | "1" => true,
            "false" | "0" => false,
            _ => return Err(conversion(&Value::Text(s.clone()), "boolean")),
        },
        other => return Err(conversion(&other, "boolean")),
    };

    Ok(Value::Bool(boolean))
}

fn coerce_date(value: Value, input_format: &str) -> Result<Value, BindError> {
    match value {
        Value::Date(d) => Ok(Value::Date(d)),
        Value::Text(s) => {
            let format = cached_format(input_format).map_err(|err| {
                BindError::new(
                    ErrorKind::TypeConversion,
                    "",
                    format!("invalid date format '{input_format}': {err}"),
                )
            })?;
            let parsed = PrimitiveDateTime::parse(&s, &*format).map_err(|_| {
                BindError::new(
                    ErrorKind::TypeConversion,
                    "",
                    format!("can't parse '{s}' as a date with format '{input_format}'"),
                )
            })?;

            Ok(Value::Date(parsed))
        }
        other => Err(conversion(&other, "date")),
    }
}

fn conversion(got: &Value, want: &str) -> BindError {
    BindError::new(
        ErrorKind::TypeConversion,
        "",
        format!("can't convert {} to {want}", got.type_name()),
    )
}
