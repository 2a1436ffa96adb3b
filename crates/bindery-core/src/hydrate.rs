//! Hydration: raw named values into validated, typed object graphs.

use crate::{
    MAX_BIND_DEPTH,
    bind::{Bindable, BoundAny, accessor},
    coerce,
    engine::Engine,
    error::{BindError, ErrorKind},
    plain,
    source::RawSource,
    value::Value,
};
use bindery_schema::resolved::FieldSchema;
use convert_case::{Case, Casing};

///
/// HydrateOptions
///
/// Visibility profiles plus the caller-requested permissive modes. Each
/// permissive flag downgrades exactly one hard failure into a silent skip
/// or pass-through.
///

#[derive(Clone, Debug)]
pub struct HydrateOptions {
    pub profiles: Vec<String>,
    pub include_default_profile: bool,
    pub ignore_mandatory: bool,
    pub ignore_not_nullable: bool,
    pub raw_mode: bool,
}

impl Default for HydrateOptions {
    fn default() -> Self {
        Self {
            profiles: Vec::new(),
            include_default_profile: true,
            ignore_mandatory: false,
            ignore_not_nullable: false,
            raw_mode: false,
        }
    }
}

impl HydrateOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.profiles.push(profile.into());
        self
    }

    #[must_use]
    pub const fn include_default_profile(mut self, include: bool) -> Self {
        self.include_default_profile = include;
        self
    }

    #[must_use]
    pub const fn ignore_mandatory(mut self, ignore: bool) -> Self {
        self.ignore_mandatory = ignore;
        self
    }

    #[must_use]
    pub const fn ignore_not_nullable(mut self, ignore: bool) -> Self {
        self.ignore_not_nullable = ignore;
        self
    }

    #[must_use]
    pub const fn raw_mode(mut self, raw: bool) -> Self {
        self.raw_mode = raw;
        self
    }
}

/// Assemble the active profile set for one pass.
pub(crate) fn active_profiles(
    profiles: &[String],
    include_default: bool,
    default_profile: &str,
) -> Vec<String> {
    let mut active = profiles.to_vec();
    if include_default && !active.iter().any(|p| p == default_profile) {
        active.push(default_profile.to_string());
    }

    active
}

///
/// BindContext
///
/// Handed to accessor setters so class-typed fields can hydrate their
/// nested values with the same options, one level deeper.
///

pub struct BindContext<'a> {
    engine: &'a Engine,
    opts: &'a HydrateOptions,
    depth: usize,
}

impl BindContext<'_> {
    pub fn hydrate<T: Bindable>(&mut self, value: Value) -> Result<T, BindError> {
        if !matches!(value, Value::Map(_)) {
            return Err(BindError::new(
                ErrorKind::TypeConversion,
                "",
                format!("expected map for class '{}', got {}", T::CLASS_NAME, value.type_name()),
            ));
        }
        check_discriminator::<T>(&value)?;
        self.engine.ensure::<T>()?;

        let mut obj = T::default();
        hydrate_into_at(self.engine, &mut obj, &value, self.opts, self.depth + 1)?;

        Ok(obj)
    }

    pub fn hydrate_opt<T: Bindable>(&mut self, value: Value) -> Result<Option<T>, BindError> {
        match value {
            Value::Null => Ok(None),
            other => self.hydrate(other).map(Some),
        }
    }

    pub fn hydrate_list<T: Bindable>(&mut self, value: Value) -> Result<Vec<T>, BindError> {
        value
            .try_list()?
            .into_iter()
            .map(|item| self.hydrate(item))
            .collect()
    }
}

///
/// Hydrator
///

pub struct Hydrator<'a> {
    engine: &'a Engine,
}

impl<'a> Hydrator<'a> {
    #[must_use]
    pub const fn new(engine: &'a Engine) -> Self {
        Self { engine }
    }

    /// Hydrate a fresh instance of `T` from `raw`. Fails fast on the first
    /// unrecoverable violation; a partial object is never returned.
    pub fn fetch<T: Bindable>(
        &self,
        raw: &dyn RawSource,
        opts: &HydrateOptions,
    ) -> Result<T, BindError> {
        check_discriminator::<T>(raw)?;

        let mut obj = T::default();
        self.hydrate_into(&mut obj, raw, opts)?;

        Ok(obj)
    }

    /// Hydrate into an existing instance. Fields absent from the input keep
    /// their current value (and have it recorded as the initial value).
    pub fn hydrate_into<T: Bindable>(
        &self,
        obj: &mut T,
        raw: &dyn RawSource,
        opts: &HydrateOptions,
    ) -> Result<(), BindError> {
        self.engine.ensure::<T>()?;
        hydrate_into_at(self.engine, obj, raw, opts, 0)
    }

    /// Hydrate by class name, honoring the class discriminator. The result
    /// is type-erased; downcast through [`BoundAny`].
    pub fn fetch_dynamic(
        &self,
        class: &str,
        raw: &dyn RawSource,
        opts: &HydrateOptions,
    ) -> Result<Box<dyn BoundAny>, BindError> {
        self.engine.dyn_hydrate_by_name(class, raw, opts, 0)
    }

    /// Rebuild an object's metadata from its current values, as if it had
    /// just been hydrated. Enables dirty tracking for hand-built objects.
    pub fn collect<T: Bindable>(&self, obj: &mut T) -> Result<(), BindError> {
        self.engine.ensure::<T>()?;
        let schema = self.engine.schemas().resolve(T::CLASS_NAME)?;

        obj.metadata_mut().clear();
        for field in &schema.fields {
            if let Some(acc) = accessor::<T>(&field.name) {
                let snapshot = plain::snapshot_value(self.engine, obj, acc, 0)?;
                obj.metadata_mut().set_init_value(&field.name, snapshot);
            }
        }

        Ok(())
    }
}

fn check_discriminator<T: Bindable>(raw: &dyn RawSource) -> Result<(), BindError> {
    match T::discriminate(raw) {
        Some(target) if target != T::CLASS_NAME => Err(BindError::new(
            ErrorKind::InternalSchema,
            T::CLASS_NAME,
            format!("discriminator selected class '{target}'; use fetch_dynamic"),
        )),
        _ => Ok(()),
    }
}

/// The per-field hydration loop. `depth` counts nested class hops; the
/// guard turns schema cycles into a structured error.
pub(crate) fn hydrate_into_at<T: Bindable>(
    engine: &Engine,
    obj: &mut T,
    raw: &dyn RawSource,
    opts: &HydrateOptions,
    depth: usize,
) -> Result<(), BindError> {
    if depth > MAX_BIND_DEPTH {
        return Err(BindError::new(
            ErrorKind::DepthLimitExceeded,
            T::CLASS_NAME,
            format!("nesting exceeds {MAX_BIND_DEPTH} levels"),
        ));
    }

    let schema = engine.schemas().resolve(T::CLASS_NAME)?;
    let active = active_profiles(
        &opts.profiles,
        opts.include_default_profile,
        &engine.schemas().globals().profile,
    );

    obj.metadata_mut().clear();

    for field in &schema.fields {
        if !field.visible(&active) {
            continue;
        }
        hydrate_field(engine, obj, raw, opts, depth, field)?;
    }

    if !obj.validate() {
        return Err(BindError::new(
            ErrorKind::Validation,
            T::CLASS_NAME,
            "object validation hook rejected the result",
        ));
    }

    Ok(())
}

fn hydrate_field<T: Bindable>(
    engine: &Engine,
    obj: &mut T,
    raw: &dyn RawSource,
    opts: &HydrateOptions,
    depth: usize,
    field: &FieldSchema,
) -> Result<(), BindError> {
    let acc = accessor::<T>(&field.name).ok_or_else(|| {
        BindError::for_field(
            ErrorKind::InternalSchema,
            T::CLASS_NAME,
            &field.name,
            "declared field has no accessor",
        )
    })?;

    let (mapped_from, value) = match locate(raw, field) {
        Some((source, value)) => (Some(source), value),
        None => {
            if field.required && !opts.ignore_mandatory {
                return Err(BindError::for_field(
                    ErrorKind::MissingRequiredField,
                    T::CLASS_NAME,
                    &field.name,
                    "field is mandatory",
                ));
            }
            match &field.default {
                Some(default) => (None, Value::from(default.clone())),
                None => {
                    // leave the current value untouched, snapshot it as-is
                    let current = plain::snapshot_value(engine, obj, acc, depth)?;
                    obj.metadata_mut().set_init_value(&field.name, current);
                    return Ok(());
                }
            }
        }
    };

    let value = if value.is_null() {
        if !field.nullable && !opts.ignore_not_nullable {
            return Err(BindError::for_field(
                ErrorKind::NotNullableViolation,
                T::CLASS_NAME,
                &field.name,
                "field is not nullable",
            ));
        }
        Value::Null
    } else if opts.raw_mode {
        value
    } else {
        coerce::coerce_field(value, field)
            .map_err(|e| e.with_context(T::CLASS_NAME, &field.name))?
    };

    if !value.is_null()
        && !opts.raw_mode
        && let Some(allowed) = &field.enum_values
        && !allowed.iter().any(|lit| Value::from(lit.clone()) == value)
    {
        return Err(BindError::for_field(
            ErrorKind::EnumViolation,
            T::CLASS_NAME,
            &field.name,
            format!("value {value:?} is out of the enumerated range"),
        ));
    }

    if !obj.validate_field(&field.name, &value) {
        return Err(BindError::for_field(
            ErrorKind::Validation,
            T::CLASS_NAME,
            &field.name,
            "field validation hook rejected the value",
        ));
    }

    let mut ctx = BindContext {
        engine,
        opts,
        depth,
    };
    (acc.set)(obj, value, &mut ctx).map_err(|e| e.with_context(T::CLASS_NAME, &field.name))?;

    if let Some(source) = mapped_from {
        obj.metadata_mut().set_mapped_from(&field.name, source);
    }
    let snapshot = plain::snapshot_value(engine, obj, acc, depth)?;
    obj.metadata_mut().set_init_value(&field.name, snapshot);

    Ok(())
}

/// Locate the raw value: source alias if declared, else the field name,
/// else its snake_case transliteration.
fn locate(raw: &dyn RawSource, field: &FieldSchema) -> Option<(String, Value)> {
    let primary = field.source_name.as_deref().unwrap_or(&field.name);
    if let Some(value) = raw.get_value(primary) {
        return Some((primary.to_string(), value));
    }

    let snake = field.name.to_case(Case::Snake);
    if snake != primary
        && let Some(value) = raw.get_value(&snake)
    {
        return Some((snake, value));
    }

    None
}
