//! Serialization: typed object graphs back to plain, ordered data.

use crate::{
    MAX_BIND_DEPTH,
    bind::{Bindable, FieldAccessor, accessor},
    date::cached_format,
    engine::Engine,
    error::{BindError, ErrorKind},
    hydrate::active_profiles,
    value::Value,
};
use bindery_schema::resolved::FieldSchema;
use convert_case::{Case, Casing};
use time::PrimitiveDateTime;

///
/// NamingMode
///
/// Which name becomes the output key for each field.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum NamingMode {
    /// The declared field name.
    #[default]
    FieldName,
    /// The source alias recorded at hydration time, falling back to the
    /// field name when none was recorded.
    SourceAlias,
    /// A snake_case transliteration of the field name.
    SnakeCase,
}

///
/// SerializeOptions
///
/// A small closed set of independent filters; no bit twiddling.
///

#[derive(Clone, Debug)]
pub struct SerializeOptions {
    pub naming: NamingMode,
    pub dirty_only: bool,
    pub exclude_null: bool,
    pub profiles: Vec<String>,
    pub include_default_profile: bool,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            naming: NamingMode::FieldName,
            dirty_only: false,
            exclude_null: false,
            profiles: Vec::new(),
            include_default_profile: true,
        }
    }
}

impl SerializeOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical options for dirty-tracking snapshots: field-name keys, no
    /// filters, default profile only. Used identically at hydration time
    /// and at dirty-compare time so the comparison is deterministic.
    #[must_use]
    pub fn snapshot() -> Self {
        Self::new()
    }

    #[must_use]
    pub const fn naming(mut self, naming: NamingMode) -> Self {
        self.naming = naming;
        self
    }

    #[must_use]
    pub const fn dirty_only(mut self, dirty: bool) -> Self {
        self.dirty_only = dirty;
        self
    }

    #[must_use]
    pub const fn exclude_null(mut self, exclude: bool) -> Self {
        self.exclude_null = exclude;
        self
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
}

///
/// PlainContext
///
/// Handed to accessor getters so class-typed fields can serialize their
/// nested objects with the same options, one level deeper.
///

pub struct PlainContext<'a> {
    engine: &'a Engine,
    opts: &'a SerializeOptions,
    depth: usize,
}

impl PlainContext<'_> {
    pub fn to_plain<T: Bindable>(&mut self, obj: &T) -> Result<Value, BindError> {
        self.engine.ensure::<T>()?;
        to_plain_at(self.engine, obj, self.opts, self.depth + 1)
    }

    pub fn to_plain_opt<T: Bindable>(&mut self, obj: Option<&T>) -> Result<Value, BindError> {
        obj.map_or(Ok(Value::Null), |inner| self.to_plain(inner))
    }

    pub fn to_plain_list<T: Bindable>(&mut self, objs: &[T]) -> Result<Value, BindError> {
        let items = objs
            .iter()
            .map(|obj| self.to_plain(obj))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Value::List(items))
    }
}

///
/// Serializer
///

pub struct Serializer<'a> {
    engine: &'a Engine,
}

impl<'a> Serializer<'a> {
    #[must_use]
    pub const fn new(engine: &'a Engine) -> Self {
        Self { engine }
    }

    /// Convert an object graph to plain data. Does not fail under normal
    /// operation; an error here indicates a schema-resolution bug.
    pub fn to_plain<T: Bindable>(
        &self,
        obj: &T,
        opts: &SerializeOptions,
    ) -> Result<Value, BindError> {
        self.engine.ensure::<T>()?;
        to_plain_at(self.engine, obj, opts, 0)
    }
}

pub(crate) fn to_plain_at<T: Bindable>(
    engine: &Engine,
    obj: &T,
    opts: &SerializeOptions,
    depth: usize,
) -> Result<Value, BindError> {
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

    let mut out: Vec<(String, Value)> = Vec::new();

    for field in &schema.fields {
        if !field.visible(&active) {
            continue;
        }
        let acc = accessor::<T>(&field.name).ok_or_else(|| {
            BindError::for_field(
                ErrorKind::InternalSchema,
                T::CLASS_NAME,
                &field.name,
                "declared field has no accessor",
            )
        })?;

        if opts.dirty_only
            && let Some(init) = obj.metadata().init_value(&field.name)
            && *init == snapshot_value(engine, obj, acc, depth)?
        {
            continue;
        }

        let mut ctx = PlainContext {
            engine,
            opts,
            depth,
        };
        let current = (acc.get)(obj, &mut ctx)
            .map_err(|e| e.with_context(T::CLASS_NAME, &field.name))?;

        if opts.exclude_null && current.is_null() {
            continue;
        }

        let key = output_key(obj, field, opts.naming);
        let converted = convert_value(current, field)
            .map_err(|e| e.with_context(T::CLASS_NAME, &field.name))?;
        out.push((key, converted));
    }

    Ok(Value::Map(out))
}

/// Snapshot a single field with the canonical snapshot options. Shared by
/// the hydrator (recording) and the serializer (dirty compare).
pub(crate) fn snapshot_value<T: Bindable>(
    engine: &Engine,
    obj: &T,
    acc: &FieldAccessor<T>,
    depth: usize,
) -> Result<Value, BindError> {
    let opts = SerializeOptions::snapshot();
    let mut ctx = PlainContext {
        engine,
        opts: &opts,
        depth,
    };

    (acc.get)(obj, &mut ctx)
}

fn output_key<T: Bindable>(obj: &T, field: &FieldSchema, naming: NamingMode) -> String {
    match naming {
        NamingMode::FieldName => field.name.clone(),
        NamingMode::SourceAlias => obj
            .metadata()
            .mapped_from(&field.name)
            .map_or_else(|| field.name.clone(), ToString::to_string),
        NamingMode::SnakeCase => field.name.to_case(Case::Snake),
    }
}

/// Final value conversion for one emitted field: dates are formatted with
/// the field's output format, array values re-apply the key policy
/// element-wise. Nested objects arrive already converted by their getter.
fn convert_value(value: Value, field: &FieldSchema) -> Result<Value, BindError> {
    match value {
        Value::Date(dt) => format_date(dt, &field.output_date_format).map(Value::Text),
        Value::List(items) => {
            let converted = items
                .into_iter()
                .map(|item| convert_value(item, field))
                .collect::<Result<Vec<_>, _>>()?;

            Ok(Value::List(converted))
        }
        Value::Map(entries) if field.is_array => {
            let mut out = Vec::with_capacity(entries.len());
            let mut next_index = 0usize;
            for (key, item) in entries {
                let key = if !field.array_policy.preserve_keys {
                    // keys dropped below by collapsing to a list
                    key
                } else if field.array_policy.preserve_only_string_keys
                    && key.parse::<usize>().is_ok()
                {
                    let position = next_index.to_string();
                    next_index += 1;
                    position
                } else {
                    key
                };
                out.push((key, convert_value(item, field)?));
            }
            if field.array_policy.preserve_keys {
                Ok(Value::Map(out))
            } else {
                Ok(Value::List(out.into_iter().map(|(_, v)| v).collect()))
            }
        }
        other => Ok(other),
    }
}

fn format_date(dt: PrimitiveDateTime, output_format: &str) -> Result<String, BindError> {
    let format = cached_format(output_format).map_err(|err| {
        BindError::new(
            ErrorKind::InternalSchema,
            "",
            format!("invalid date format '{output_format}': {err}"),
        )
    })?;

    dt.format(&*format).map_err(|err| {
        BindError::new(
            ErrorKind::InternalSchema,
            "",
            format!("can't format date with '{output_format}': {err}"),
        )
    })
}
