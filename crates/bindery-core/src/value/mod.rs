mod json;


use crate::error::{BindError, ErrorKind};
use bindery_schema::{DEFAULT_DATE_FORMAT, literal::Literal};
use serde::{Serialize, Serializer, ser::SerializeMap};
use time::PrimitiveDateTime;

pub use json::{from_json, to_json};

///
/// Value
///
/// The canonical untyped representation flowing through hydration and
/// serialization.
///
/// Null → explicit null in the raw input, or an Option::None field.
/// Map  → ordered string-keyed entries; insertion order is preserved so
///        serialization output stays deterministic.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(PrimitiveDateTime),
    List(Vec<Self>),
    Map(Vec<(String, Self)>),
}

impl Value {
    ///
    /// CONSTRUCTION
    ///

    #[must_use]
    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Self>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Self>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    ///
    /// INSPECTION
    ///

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Date(_) => "date",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }

    /// Look up a key in a `Map` value. Non-map values have no keys.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    ///
    /// STRICT EXTRACTION
    ///
    /// Used by accessor setters on already-coerced values. Context (class and
    /// field) is filled in by the hydrator via `BindError::with_context`.
    ///

    pub fn try_text(self) -> Result<String, BindError> {
        match self {
            Self::Text(s) => Ok(s),
            other => Err(expected("text", &other)),
        }
    }

    pub fn try_int(self) -> Result<i64, BindError> {
        match self {
            Self::Int(i) => Ok(i),
            other => Err(expected("integer", &other)),
        }
    }

    pub fn try_float(self) -> Result<f64, BindError> {
        match self {
            Self::Float(f) => Ok(f),
            Self::Int(i) => Ok(i as f64),
            other => Err(expected("float", &other)),
        }
    }

    pub fn try_bool(self) -> Result<bool, BindError> {
        match self {
            Self::Bool(b) => Ok(b),
            other => Err(expected("boolean", &other)),
        }
    }

    pub fn try_date(self) -> Result<PrimitiveDateTime, BindError> {
        match self {
            Self::Date(d) => Ok(d),
            other => Err(expected("date", &other)),
        }
    }

    pub fn try_list(self) -> Result<Vec<Self>, BindError> {
        match self {
            Self::List(items) => Ok(items),
            Self::Map(entries) => Ok(entries.into_iter().map(|(_, v)| v).collect()),
            other => Err(expected("list", &other)),
        }
    }

    /// Null-tolerant extraction for `Option` fields.
    pub fn try_opt<T>(
        self,
        extract: impl FnOnce(Self) -> Result<T, BindError>,
    ) -> Result<Option<T>, BindError> {
        match self {
            Self::Null => Ok(None),
            other => extract(other).map(Some),
        }
    }
}

fn expected(want: &str, got: &Value) -> BindError {
    BindError::new(
        ErrorKind::TypeConversion,
        "",
        format!("expected {want}, got {}", got.type_name()),
    )
}

///
/// CONVERSIONS
///

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<PrimitiveDateTime> for Value {
    fn from(v: PrimitiveDateTime) -> Self {
        Self::Date(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<Literal> for Value {
    fn from(lit: Literal) -> Self {
        match lit {
            Literal::Null => Self::Null,
            Literal::Bool(b) => Self::Bool(b),
            Literal::Int(i) => Self::Int(i),
            Literal::Float(f) => Self::Float(f),
            Literal::Text(s) => Self::Text(s),
            Literal::List(items) => Self::List(items.into_iter().map(Self::from).collect()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Date(d) => {
                // dates carry no format of their own; exported with the
                // engine-wide default
                let format = crate::date::cached_format(DEFAULT_DATE_FORMAT)
                    .map_err(serde::ser::Error::custom)?;
                let text = d.format(&*format).map_err(serde::ser::Error::custom)?;
                serializer.serialize_str(&text)
            }
            Self::List(items) => items.serialize(serializer),
            Self::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}
