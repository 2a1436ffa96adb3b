use bindery_schema::{
    error::SchemaError,
    registry::SchemaRegistry,
    resolved::{ClassSchema, FieldSchema},
    types::{ScalarType, TypeTag},
};
use convert_case::{Case, Casing};
use std::collections::BTreeSet;
use std::fmt::Write;

///
/// TsGenerator
///
/// Walks a class schema's transitive dependency closure and emits, per
/// class: a structural `interface I<Name>`, a standalone `bind<Name>`
/// function repeating the hydrator's required/nullable checks as generated
/// code, and a `class <Name>` wrapper whose constructor delegates to the
/// binder. Dependency classes are emitted before their dependents; the
/// caller-owned `emitted` set prevents duplicate emission across a
/// multi-class run.
///

pub struct TsGenerator<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> TsGenerator<'a> {
    #[must_use]
    pub const fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Generate declarations for `class` and every dependency not already in
    /// `emitted`. Emitted class names are added to `emitted` so subsequent
    /// calls skip them.
    pub fn generate(
        &self,
        class: &str,
        emitted: &mut BTreeSet<String>,
    ) -> Result<String, SchemaError> {
        let mut out = String::new();
        let mut in_progress = BTreeSet::new();
        self.emit_closure(class, emitted, &mut in_progress, &mut out)?;

        Ok(out)
    }

    fn emit_closure(
        &self,
        class: &str,
        emitted: &mut BTreeSet<String>,
        in_progress: &mut BTreeSet<String>,
        out: &mut String,
    ) -> Result<(), SchemaError> {
        // in_progress breaks schema cycles; the declaration under way will
        // cover the back-reference by name
        if emitted.contains(class) || in_progress.contains(class) {
            return Ok(());
        }
        in_progress.insert(class.to_string());

        let schema = self.registry.resolve(class)?;
        for dep in schema.class_deps() {
            self.emit_closure(dep, emitted, in_progress, out)?;
        }

        emit_interface(&schema, out);
        emit_binder(&schema, out);
        emit_wrapper(&schema, out);

        in_progress.remove(class);
        emitted.insert(class.to_string());

        Ok(())
    }
}

fn visible_fields(schema: &ClassSchema) -> impl Iterator<Item = &FieldSchema> {
    let active = std::slice::from_ref(&schema.default_profile);
    schema.fields.iter().filter(move |f| f.visible(active))
}

fn emit_interface(schema: &ClassSchema, out: &mut String) {
    let _ = writeln!(out, "export interface I{} {{", schema.name);
    for field in visible_fields(schema) {
        let optional = if field.required { "" } else { "?" };
        let _ = writeln!(out, "    {}{optional}: {};", field.name, ts_type(field));
    }
    let _ = writeln!(out, "}}\n");
}

fn emit_binder(schema: &ClassSchema, out: &mut String) {
    let _ = writeln!(
        out,
        "export function bind{0}(data: any): I{0} {{",
        schema.name
    );
    let _ = writeln!(out, "    const out: any = {{}};");

    for field in visible_fields(schema) {
        emit_field_binding(schema, field, out);
    }

    let _ = writeln!(out, "    return out as I{};", schema.name);
    let _ = writeln!(out, "}}\n");
}

fn emit_field_binding(schema: &ClassSchema, field: &FieldSchema, out: &mut String) {
    let _ = writeln!(out, "    {{");

    // locate: declared alias or field name, then the snake_case fallback
    let primary = field.source_name.as_deref().unwrap_or(&field.name);
    let _ = writeln!(out, "        let v: any = data[{primary:?}];");
    let snake = field.name.to_case(Case::Snake);
    if snake != primary {
        let _ = writeln!(out, "        if (v === undefined) {{ v = data[{snake:?}]; }}");
    }

    if field.required {
        let _ = writeln!(
            out,
            "        if (v === undefined) {{ throw new Error({:?}); }}",
            format!("{}.{}: field is mandatory", schema.name, field.name)
        );
    } else {
        let _ = writeln!(out, "        if (v !== undefined) {{");
    }

    let indent = if field.required { "        " } else { "            " };
    if !field.nullable {
        let _ = writeln!(
            out,
            "{indent}if (v === null) {{ throw new Error({:?}); }}",
            format!("{}.{}: field is not nullable", schema.name, field.name)
        );
    }
    let _ = writeln!(
        out,
        "{indent}out[{:?}] = {};",
        field.name,
        bound_expr(field)
    );

    if !field.required {
        let _ = writeln!(out, "        }}");
    }
    let _ = writeln!(out, "    }}");
}

/// The expression assigned for a located value `v`. Class-typed fields
/// recurse through the referenced class's binder, element-wise for arrays.
fn bound_expr(field: &FieldSchema) -> String {
    let TypeTag::Class(class) = &field.ty else {
        return "v".to_string();
    };

    if !field.is_array {
        format!("v === null ? null : bind{class}(v)")
    } else if field.array_policy.preserve_keys {
        format!(
            "v === null ? null : Object.fromEntries(Object.entries(v).map(([k, e]) => [k, bind{class}(e)]))"
        )
    } else {
        format!("v === null ? null : v.map(bind{class})")
    }
}

fn emit_wrapper(schema: &ClassSchema, out: &mut String) {
    let _ = writeln!(out, "export class {} {{", schema.name);
    let _ = writeln!(out, "    constructor(data: any) {{");
    let _ = writeln!(out, "        Object.assign(this, bind{}(data));", schema.name);
    let _ = writeln!(out, "    }}");
    let _ = writeln!(out, "}}\n");
}

/// Map a field to its TypeScript type: `[]` arrays for positional fields,
/// string-keyed objects for key-preserving arrays, `| null` for nullable.
fn ts_type(field: &FieldSchema) -> String {
    let base = match &field.ty {
        TypeTag::Scalar(tag) => match tag {
            ScalarType::String | ScalarType::Date => "string".to_string(),
            ScalarType::Integer | ScalarType::Float => "number".to_string(),
            ScalarType::Boolean => "boolean".to_string(),
            ScalarType::Array | ScalarType::Raw => "any".to_string(),
        },
        TypeTag::Class(class) => format!("I{class}"),
    };

    let shaped = if !field.is_array {
        base
    } else if field.array_policy.preserve_keys {
        format!("{{ [key: string]: {base} }}")
    } else {
        format!("{base}[]")
    };

    if field.nullable {
        format!("{shaped} | null")
    } else {
        shaped
    }
}
