use crate::{
    literal::Literal,
    types::{ArrayPolicy, TypeTag},
};
use serde::Serialize;

///
/// FieldSchema
///
/// Fully resolved per-field metadata. Immutable once produced by
/// resolution; every attribute has had its precedence chain applied.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldSchema {
    pub name: String,
    pub ty: TypeTag,
    pub is_array: bool,
    pub array_policy: ArrayPolicy,
    pub nullable: bool,
    pub required: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Literal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Literal>>,

    /// Never empty after resolution; falls back to the class default profile.
    pub profiles: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude_profiles: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,

    pub input_date_format: String,
    pub output_date_format: String,
}

impl FieldSchema {
    /// A field is visible iff its profiles intersect the active set and its
    /// exclude list does not.
    #[must_use]
    pub fn visible(&self, active: &[String]) -> bool {
        let shown = self.profiles.iter().any(|p| active.contains(p));
        let hidden = self.exclude_profiles.iter().any(|p| active.contains(p));

        shown && !hidden
    }
}

///
/// ClassSchema
///
/// The resolved field table for one class, in declaration order (own fields
/// first, then inherited fields not overridden), plus the resolved
/// class-level defaults.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClassSchema {
    pub name: String,
    pub fields: Vec<FieldSchema>,
    pub default_profile: String,
    pub date_format: String,
    pub required_default: bool,
    pub nullable_default: bool,
}

impl ClassSchema {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Class names this schema refers to through class-typed fields, in
    /// declaration order, deduplicated.
    #[must_use]
    pub fn class_deps(&self) -> Vec<&str> {
        let mut deps: Vec<&str> = Vec::new();
        for field in &self.fields {
            if let Some(class) = field.ty.as_class()
                && !deps.contains(&class)
            {
                deps.push(class);
            }
        }

        deps
    }
}
