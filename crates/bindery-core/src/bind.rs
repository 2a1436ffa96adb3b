use crate::{
    error::BindError, hydrate::BindContext, meta::InstanceMetadata, plain::PlainContext,
    source::RawSource, value::Value,
};
use bindery_schema::decl::ClassDecl;
use std::any::Any;

///
/// FieldAccessor
///
/// Explicit get/set capability pair for one field, replacing runtime
/// property reflection. Setters receive the hydration context so
/// class-typed fields can recurse; getters receive the serialization
/// context for the same reason.
///

pub struct FieldAccessor<T> {
    pub field: &'static str,
    pub get: fn(&T, &mut PlainContext<'_>) -> Result<Value, BindError>,
    pub set: fn(&mut T, Value, &mut BindContext<'_>) -> Result<(), BindError>,
}

impl<T> FieldAccessor<T> {
    #[must_use]
    pub const fn new(
        field: &'static str,
        get: fn(&T, &mut PlainContext<'_>) -> Result<Value, BindError>,
        set: fn(&mut T, Value, &mut BindContext<'_>) -> Result<(), BindError>,
    ) -> Self {
        Self { field, get, set }
    }
}

///
/// Bindable
///
/// A class participating in hydration and serialization: a declaration, an
/// accessor table, owned instance metadata, and optional validation and
/// discriminator hooks.
///

pub trait Bindable: Default + Sized + 'static {
    const CLASS_NAME: &'static str;

    /// Declarative field metadata for this class.
    fn decl() -> ClassDecl;

    /// Accessor table, one entry per declared field.
    fn accessors() -> &'static [FieldAccessor<Self>];

    fn metadata(&self) -> &InstanceMetadata;

    fn metadata_mut(&mut self) -> &mut InstanceMetadata;

    /// Per-field validation hook, consulted after coercion. `false` aborts
    /// hydration with a validation error.
    fn validate_field(&self, _field: &str, _value: &Value) -> bool {
        true
    }

    /// Whole-object validation hook, consulted after all fields are set.
    fn validate(&self) -> bool {
        true
    }

    /// Class discriminator: given the raw input, select a more specific
    /// registered class to hydrate into. Honored by the dynamic path.
    fn discriminate(_raw: &dyn RawSource) -> Option<&'static str> {
        None
    }
}

pub(crate) fn accessor<T: Bindable>(field: &str) -> Option<&'static FieldAccessor<T>> {
    T::accessors().iter().find(|a| a.field == field)
}

///
/// BoundAny
///
/// Type-erased hydration result, used when a class discriminator selects
/// the concrete class at runtime. Downcast via `as_any`/`into_any`.
///

pub trait BoundAny: Any {
    fn class_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Bindable> BoundAny for T {
    fn class_name(&self) -> &'static str {
        Self::CLASS_NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}
