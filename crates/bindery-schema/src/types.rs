use derive_more::{Display, FromStr};
use serde::{Deserialize, Serialize};
use std::str::FromStr as _;

///
/// ScalarType
///
/// Canonical type tags a field can be coerced to. Class-typed fields are
/// represented by [`TypeTag::Class`], not by a scalar tag.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, FromStr, PartialEq, Serialize)]
pub enum ScalarType {
    #[display("string")]
    String,
    #[display("integer")]
    Integer,
    #[display("float")]
    Float,
    #[display("boolean")]
    Boolean,
    #[display("array")]
    Array,
    #[display("date")]
    Date,
    #[display("raw")]
    Raw,
}

impl ScalarType {
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }

    /// Tags whose coercion is the identity function.
    #[must_use]
    pub const fn is_passthrough(self) -> bool {
        matches!(self, Self::Array | Self::Raw)
    }
}

///
/// TypeTag
///
/// Declared type of a field: a canonical scalar, or a reference to another
/// registered class.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum TypeTag {
    Scalar(ScalarType),
    Class(String),
}

impl TypeTag {
    /// Parse a declared tag string. Anything that is not a canonical scalar
    /// tag is treated as a class reference; whether that class exists is
    /// checked at coercion time, not here.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        ScalarType::from_str(s).map_or_else(|_| Self::Class(s.to_string()), Self::Scalar)
    }

    #[must_use]
    pub fn class(name: impl Into<String>) -> Self {
        Self::Class(name.into())
    }

    #[must_use]
    pub const fn as_scalar(&self) -> Option<ScalarType> {
        match self {
            Self::Scalar(s) => Some(*s),
            Self::Class(_) => None,
        }
    }

    #[must_use]
    pub fn as_class(&self) -> Option<&str> {
        match self {
            Self::Scalar(_) => None,
            Self::Class(name) => Some(name),
        }
    }

    #[must_use]
    pub const fn is_class(&self) -> bool {
        matches!(self, Self::Class(_))
    }
}

impl From<ScalarType> for TypeTag {
    fn from(s: ScalarType) -> Self {
        Self::Scalar(s)
    }
}

///
/// TypeInfo
///
/// Statically introspected type information for a field, supplied by the
/// declaring code when no explicit tag is given. Collection-ness carries the
/// element type in `tag`.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TypeInfo {
    pub tag: TypeTag,
    pub nullable: bool,
    pub is_collection: bool,
}

impl TypeInfo {
    #[must_use]
    pub const fn new(tag: TypeTag, nullable: bool, is_collection: bool) -> Self {
        Self {
            tag,
            nullable,
            is_collection,
        }
    }
}

///
/// ArrayPolicy
///
/// Key handling for array-typed fields. Defaults to preserving keys, with
/// numeric-string keys re-indexed as list positions.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ArrayPolicy {
    pub preserve_keys: bool,
    pub preserve_only_string_keys: bool,
}

impl ArrayPolicy {
    #[must_use]
    pub const fn new(preserve_keys: bool, preserve_only_string_keys: bool) -> Self {
        Self {
            preserve_keys,
            preserve_only_string_keys,
        }
    }
}

impl Default for ArrayPolicy {
    fn default() -> Self {
        Self::new(true, true)
    }
}
