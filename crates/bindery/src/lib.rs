//! Schema-driven data binding: hydration of untyped key/value data into
//! typed object graphs, serialization back to plain data, and TypeScript
//! generation from class schemas.
//!
//! ## Crate layout
//! - `schema`: declarations, resolution, and the caller-owned registry.
//! - `core`: the value model, coercion, the hydrator, the serializer, and
//!   the engine tying them to the registry.
//! - `typegen`: TypeScript interface/binder/wrapper emission.
//!
//! The `prelude` module mirrors the surface application code touches.

pub use bindery_core as core;
pub use bindery_schema as schema;
pub use bindery_typegen as typegen;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use core::{engine::Engine, error::BindError, value::Value};

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::{
        core::{
            bind::{Bindable, BoundAny, FieldAccessor},
            engine::Engine,
            error::{BindError, ErrorKind},
            hydrate::{BindContext, HydrateOptions, Hydrator},
            introspect::{StaticType as _, field},
            meta::InstanceMetadata,
            plain::{NamingMode, PlainContext, SerializeOptions, Serializer},
            source::RawSource,
            value::{Value, from_json, to_json},
        },
        schema::{
            decl::{ClassDecl, ClassDefaults, FieldDecl, GlobalDefaults},
            error::SchemaError,
            literal::Literal,
            registry::SchemaRegistry,
            resolved::{ClassSchema, FieldSchema},
            types::{ArrayPolicy, ScalarType, TypeInfo, TypeTag},
        },
        typegen::TsGenerator,
    };
}
