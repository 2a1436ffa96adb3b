//! Core runtime for bindery: the value model, type coercion, the hydrator,
//! the serializer, and the engine that ties them to the schema registry.

pub mod bind;
pub mod coerce;
pub(crate) mod date;
pub mod engine;
pub mod error;
pub mod hydrate;
pub mod introspect;
pub mod meta;
pub mod plain;
pub mod source;
pub mod value;

#[cfg(test)]
pub(crate) mod test_fixtures;

///
/// CONSTANTS
///

/// Maximum nesting depth during hydration and serialization.
///
/// Schema reference graphs may be cyclic; this bound turns runaway recursion
/// on self-referential data into a structured error.
pub const MAX_BIND_DEPTH: usize = 64;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
///

pub mod prelude {
    pub use crate::{
        bind::{Bindable, BoundAny, FieldAccessor},
        engine::Engine,
        error::{BindError, ErrorKind},
        hydrate::HydrateOptions,
        plain::{NamingMode, SerializeOptions},
        value::Value,
    };
    pub use bindery_schema::prelude::*;
}
