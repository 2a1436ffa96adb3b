//! Precedence merge turning declarations into resolved schemas.
//!
//! For every field the merge order is, most specific first: the field's own
//! declaration, the nearest ancestor's declaration of the same name, class
//! defaults (child chain first), global defaults.

use crate::{
    MAX_CLASS_NAME_LEN, MAX_FIELD_NAME_LEN, RESERVED_FIELD_NAMES,
    decl::{ClassDecl, ClassDefaults, FieldDecl, GlobalDefaults},
    error::SchemaError,
    resolved::{ClassSchema, FieldSchema},
    types::{ArrayPolicy, ScalarType, TypeTag},
};
use std::collections::HashMap;

/// Resolve `name` against the declaration table. Pure: equal inputs produce
/// an equal schema, which is what makes cached resolution idempotent.
pub(crate) fn resolve(
    decls: &HashMap<String, ClassDecl>,
    globals: &GlobalDefaults,
    name: &str,
) -> Result<ClassSchema, SchemaError> {
    let chain = parent_chain(decls, name)?;
    let decl = chain[0];

    // every declaration in the chain must pass, or inherited fields would
    // smuggle in names the class itself could not declare
    for member in &chain {
        check_class(member)?;
    }

    let defaults = effective_defaults(&chain, globals);

    let mut fields = Vec::new();
    for (owner_idx, field_name) in field_order(&chain) {
        let merged = merge_field(&chain[owner_idx..], &field_name);
        fields.push(finalize_field(decl, merged, &defaults)?);
    }

    Ok(ClassSchema {
        name: decl.name.clone(),
        fields,
        default_profile: defaults.profile,
        date_format: defaults.date_format,
        required_default: defaults.required,
        nullable_default: defaults.nullable,
    })
}

struct EffectiveDefaults {
    required: bool,
    profile: String,
    date_format: String,
    nullable: bool,
}

/// Walk the parent chain, child first. A missing parent or a cycle is a
/// declaration error.
fn parent_chain<'a>(
    decls: &'a HashMap<String, ClassDecl>,
    name: &str,
) -> Result<Vec<&'a ClassDecl>, SchemaError> {
    let mut chain = Vec::new();
    let mut current = Some(name.to_string());

    while let Some(class) = current {
        let decl = decls.get(&class).ok_or(SchemaError::UnknownClass {
            class: class.clone(),
        })?;
        if chain.iter().any(|c: &&ClassDecl| c.name == decl.name) {
            return Err(SchemaError::ParentCycle {
                class: name.to_string(),
            });
        }
        chain.push(decl);
        current = decl.parent.clone();
    }

    Ok(chain)
}

fn check_class(decl: &ClassDecl) -> Result<(), SchemaError> {
    if decl.name.len() > MAX_CLASS_NAME_LEN {
        return Err(SchemaError::NameTooLong {
            name: decl.name.clone(),
            max: MAX_CLASS_NAME_LEN,
        });
    }

    for (idx, field) in decl.fields.iter().enumerate() {
        if field.name.is_empty() {
            return Err(SchemaError::EmptyFieldName {
                class: decl.name.clone(),
            });
        }
        if field.name.len() > MAX_FIELD_NAME_LEN {
            return Err(SchemaError::NameTooLong {
                name: field.name.clone(),
                max: MAX_FIELD_NAME_LEN,
            });
        }
        if RESERVED_FIELD_NAMES.contains(&field.name.as_str()) {
            return Err(SchemaError::ReservedField {
                class: decl.name.clone(),
                field: field.name.clone(),
            });
        }
        if decl.fields[..idx].iter().any(|f| f.name == field.name) {
            return Err(SchemaError::DuplicateField {
                class: decl.name.clone(),
                field: field.name.clone(),
            });
        }
    }

    Ok(())
}

fn effective_defaults(chain: &[&ClassDecl], globals: &GlobalDefaults) -> EffectiveDefaults {
    let mut merged = ClassDefaults::default();
    for decl in chain {
        merged.merge_unset(&decl.defaults);
    }

    EffectiveDefaults {
        required: merged.required.unwrap_or(globals.required),
        profile: merged.profile.unwrap_or_else(|| globals.profile.clone()),
        date_format: merged
            .date_format
            .unwrap_or_else(|| globals.date_format.clone()),
        nullable: merged.nullable.unwrap_or(globals.nullable),
    }
}

/// Field emission order: each field appears once, owned by the nearest class
/// in the chain that declares it, own fields before inherited ones.
fn field_order(chain: &[&ClassDecl]) -> Vec<(usize, String)> {
    let mut order: Vec<(usize, String)> = Vec::new();
    for (idx, decl) in chain.iter().enumerate() {
        for field in &decl.fields {
            if !order.iter().any(|(_, name)| *name == field.name) {
                order.push((idx, field.name.clone()));
            }
        }
    }

    order
}

/// Merge a field declaration with every ancestor declaration of the same
/// name, nearest first.
fn merge_field(chain: &[&ClassDecl], field_name: &str) -> FieldDecl {
    let mut merged = chain[0]
        .get(field_name)
        .cloned()
        .unwrap_or_else(|| FieldDecl::new(field_name));
    for decl in &chain[1..] {
        if let Some(ancestor) = decl.get(field_name) {
            merged.merge_unset(ancestor);
        }
    }

    merged
}

fn finalize_field(
    class: &ClassDecl,
    decl: FieldDecl,
    defaults: &EffectiveDefaults,
) -> Result<FieldSchema, SchemaError> {
    if let Some(values) = &decl.enum_values
        && values.is_empty()
    {
        return Err(SchemaError::EmptyEnum {
            class: class.name.clone(),
            field: decl.name,
        });
    }

    // Explicit type wins outright, including its own array flag. Otherwise
    // infer from the static type; anything inferable but unannotated is raw.
    let (ty, is_array, inferred_nullable) = match (&decl.ty, &decl.inferred) {
        (Some(tag), _) => (tag.clone(), decl.is_array.unwrap_or(false), None),
        (None, Some(info)) => (
            info.tag.clone(),
            decl.is_array.unwrap_or(info.is_collection),
            Some(info.nullable),
        ),
        (None, None) => (
            TypeTag::Scalar(ScalarType::Raw),
            decl.is_array.unwrap_or(false),
            None,
        ),
    };

    let array_policy = ArrayPolicy::new(
        decl.preserve_keys.unwrap_or(true),
        decl.preserve_only_string_keys.unwrap_or(true),
    );

    let profiles = if decl.profiles.is_empty() {
        vec![defaults.profile.clone()]
    } else {
        decl.profiles
    };

    Ok(FieldSchema {
        name: decl.name,
        ty,
        is_array,
        array_policy,
        nullable: decl
            .nullable
            .or(inferred_nullable)
            .unwrap_or(defaults.nullable),
        required: decl.required.unwrap_or(defaults.required),
        default: decl.default,
        enum_values: decl.enum_values,
        profiles,
        exclude_profiles: decl.exclude_profiles,
        source_name: decl.source_name,
        input_date_format: decl
            .input_date_format
            .unwrap_or_else(|| defaults.date_format.clone()),
        output_date_format: decl
            .output_date_format
            .unwrap_or_else(|| defaults.date_format.clone()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeInfo;

    fn table(decls: Vec<ClassDecl>) -> HashMap<String, ClassDecl> {
        decls.into_iter().map(|d| (d.name.clone(), d)).collect()
    }

    fn resolve_one(decls: Vec<ClassDecl>, name: &str) -> ClassSchema {
        resolve(&table(decls), &GlobalDefaults::default(), name).unwrap()
    }

    #[test]
    fn explicit_type_wins_over_inference() {
        let decl = ClassDecl::new("A").field(
            FieldDecl::new("count")
                .ty(ScalarType::String)
                .inferred(TypeInfo::new(ScalarType::Integer.into(), false, true)),
        );

        let schema = resolve_one(vec![decl], "A");
        let field = schema.get("count").unwrap();

        assert_eq!(field.ty, TypeTag::Scalar(ScalarType::String));
        assert!(!field.is_array);
    }

    #[test]
    fn collection_inference_sets_array_with_element_type() {
        let decl = ClassDecl::new("A").field(
            FieldDecl::new("tags").inferred(TypeInfo::new(ScalarType::String.into(), false, true)),
        );

        let schema = resolve_one(vec![decl], "A");
        let field = schema.get("tags").unwrap();

        assert!(field.is_array);
        assert_eq!(field.ty, TypeTag::Scalar(ScalarType::String));
        assert_eq!(field.array_policy, ArrayPolicy::new(true, true));
    }

    #[test]
    fn unannotated_field_becomes_raw() {
        let decl = ClassDecl::new("A").field(FieldDecl::new("extra"));
        let schema = resolve_one(vec![decl], "A");

        assert_eq!(
            schema.get("extra").unwrap().ty,
            TypeTag::Scalar(ScalarType::Raw)
        );
    }

    #[test]
    fn profiles_fall_back_to_class_default() {
        let decl = ClassDecl::new("A")
            .defaults(ClassDefaults {
                profile: Some("internal".to_string()),
                ..ClassDefaults::default()
            })
            .field(FieldDecl::new("id"))
            .field(FieldDecl::new("secret").profile("admin"));

        let schema = resolve_one(vec![decl], "A");

        assert_eq!(schema.get("id").unwrap().profiles, vec!["internal"]);
        assert_eq!(schema.get("secret").unwrap().profiles, vec!["admin"]);
    }

    #[test]
    fn inherited_field_attributes_fill_from_parent() {
        let parent = ClassDecl::new("Base")
            .field(
                FieldDecl::new("id")
                    .ty(ScalarType::Integer)
                    .required(true)
                    .source_name("base_id"),
            )
            .field(FieldDecl::new("label").ty(ScalarType::String));
        let child = ClassDecl::new("Child")
            .parent("Base")
            .field(FieldDecl::new("id").required(false))
            .field(FieldDecl::new("own").ty(ScalarType::Boolean));

        let schema = resolve_one(vec![parent, child], "Child");

        // own declarations first, then inherited
        let names: Vec<&str> = schema.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "own", "label"]);

        let id = schema.get("id").unwrap();
        assert_eq!(id.ty, TypeTag::Scalar(ScalarType::Integer));
        assert!(!id.required);
        assert_eq!(id.source_name.as_deref(), Some("base_id"));
    }

    #[test]
    fn class_defaults_chain_child_wins() {
        let parent = ClassDecl::new("Base").defaults(ClassDefaults {
            required: Some(true),
            profile: Some("base".to_string()),
            ..ClassDefaults::default()
        });
        let child = ClassDecl::new("Child")
            .parent("Base")
            .defaults(ClassDefaults {
                required: Some(false),
                ..ClassDefaults::default()
            })
            .field(FieldDecl::new("x"));

        let schema = resolve_one(vec![parent, child], "Child");
        let x = schema.get("x").unwrap();

        assert!(!x.required);
        assert_eq!(x.profiles, vec!["base"]);
    }

    #[test]
    fn date_formats_fall_back_to_class_then_global() {
        let decl = ClassDecl::new("A")
            .defaults(ClassDefaults {
                date_format: Some("[year]".to_string()),
                ..ClassDefaults::default()
            })
            .field(FieldDecl::new("created").ty(ScalarType::Date))
            .field(
                FieldDecl::new("updated")
                    .ty(ScalarType::Date)
                    .input_date_format("[year]-[month]"),
            );

        let schema = resolve_one(vec![decl], "A");

        assert_eq!(schema.get("created").unwrap().input_date_format, "[year]");
        assert_eq!(
            schema.get("updated").unwrap().input_date_format,
            "[year]-[month]"
        );
        assert_eq!(schema.get("updated").unwrap().output_date_format, "[year]");
    }

    #[test]
    fn reserved_field_name_is_rejected() {
        let decl = ClassDecl::new("A").field(FieldDecl::new("metadata"));
        let err = resolve(&table(vec![decl]), &GlobalDefaults::default(), "A").unwrap_err();

        assert!(matches!(err, SchemaError::ReservedField { .. }));
    }

    #[test]
    fn inherited_reserved_field_is_rejected() {
        let base = ClassDecl::new("Base").field(FieldDecl::new("metadata"));
        let child = ClassDecl::new("Child")
            .parent("Base")
            .field(FieldDecl::new("own"));

        // the child declares nothing reserved itself, the ancestor does
        let err = resolve(&table(vec![base, child]), &GlobalDefaults::default(), "Child")
            .unwrap_err();

        assert!(matches!(
            err,
            SchemaError::ReservedField { ref class, ref field }
                if class == "Base" && field == "metadata"
        ));
    }

    #[test]
    fn parent_cycle_is_detected() {
        let a = ClassDecl::new("A").parent("B");
        let b = ClassDecl::new("B").parent("A");
        let err = resolve(&table(vec![a, b]), &GlobalDefaults::default(), "A").unwrap_err();

        assert!(matches!(err, SchemaError::ParentCycle { .. }));
    }

    #[test]
    fn empty_enum_set_is_rejected() {
        let decl = ClassDecl::new("A").field(
            FieldDecl::new("status")
                .ty(ScalarType::String)
                .enum_values(Vec::<&str>::new()),
        );
        let err = resolve(&table(vec![decl]), &GlobalDefaults::default(), "A").unwrap_err();

        assert!(matches!(err, SchemaError::EmptyEnum { .. }));
    }
}
