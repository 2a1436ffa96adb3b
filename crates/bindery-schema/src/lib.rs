//! Schema model for the bindery engine: field/class declarations, the
//! precedence merge that resolves them, and the caching registry.

pub mod decl;
pub mod error;
pub mod literal;
pub mod registry;
pub mod resolve;
pub mod resolved;
pub mod types;

/// Maximum length for class schema identifiers.
pub const MAX_CLASS_NAME_LEN: usize = 128;

/// Maximum length for field schema identifiers.
pub const MAX_FIELD_NAME_LEN: usize = 64;

/// Default visibility profile when neither the field nor the class declares
/// one.
pub const DEFAULT_PROFILE: &str = "common";

/// Default date format (W3C-style, no offset) in `time` format-description
/// syntax.
pub const DEFAULT_DATE_FORMAT: &str = "[year]-[month]-[day]T[hour]:[minute]:[second]";

/// Field names that collide with the binding surface of hydrated objects.
pub const RESERVED_FIELD_NAMES: &[&str] = &["metadata", "class"];

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        decl::{ClassDecl, ClassDefaults, FieldDecl, GlobalDefaults},
        error::SchemaError,
        literal::Literal,
        registry::SchemaRegistry,
        resolved::{ClassSchema, FieldSchema},
        types::{ArrayPolicy, ScalarType, TypeInfo, TypeTag},
    };
}
