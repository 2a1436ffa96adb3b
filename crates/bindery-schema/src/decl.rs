use crate::{
    DEFAULT_DATE_FORMAT, DEFAULT_PROFILE,
    literal::Literal,
    types::{TypeInfo, TypeTag},
};
use serde::{Deserialize, Serialize};

///
/// GlobalDefaults
///
/// Engine-wide fallbacks, applied after class defaults during resolution.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GlobalDefaults {
    pub required: bool,
    pub profile: String,
    pub date_format: String,
    pub nullable: bool,
}

impl Default for GlobalDefaults {
    fn default() -> Self {
        Self {
            required: false,
            profile: DEFAULT_PROFILE.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            nullable: true,
        }
    }
}

///
/// ClassDefaults
///
/// Class-level overrides of the global defaults. Every attribute is
/// optional; unset attributes fall through to the parent class, then to the
/// globals.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ClassDefaults {
    pub required: Option<bool>,
    pub profile: Option<String>,
    pub date_format: Option<String>,
    pub nullable: Option<bool>,
}

impl ClassDefaults {
    /// Fill unset attributes from `other` (parent-class defaults).
    pub(crate) fn merge_unset(&mut self, other: &Self) {
        if self.required.is_none() {
            self.required = other.required;
        }
        if self.profile.is_none() {
            self.profile.clone_from(&other.profile);
        }
        if self.date_format.is_none() {
            self.date_format.clone_from(&other.date_format);
        }
        if self.nullable.is_none() {
            self.nullable = other.nullable;
        }
    }
}

///
/// FieldDecl
///
/// Declarative per-field metadata, built through the fluent API below. Any
/// attribute left unset is filled during resolution from the nearest
/// ancestor's declaration of the same field, then the class defaults, then
/// the globals.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct FieldDecl {
    pub name: String,
    pub ty: Option<TypeTag>,
    pub is_array: Option<bool>,
    pub preserve_keys: Option<bool>,
    pub preserve_only_string_keys: Option<bool>,
    pub nullable: Option<bool>,
    pub required: Option<bool>,
    pub default: Option<Literal>,
    pub enum_values: Option<Vec<Literal>>,
    pub profiles: Vec<String>,
    pub exclude_profiles: Vec<String>,
    pub source_name: Option<String>,
    pub input_date_format: Option<String>,
    pub output_date_format: Option<String>,

    /// Statically introspected type of the declaring struct field, used when
    /// no explicit `ty` is given.
    pub inferred: Option<TypeInfo>,
}

impl FieldDecl {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn ty(mut self, tag: impl Into<TypeTag>) -> Self {
        self.ty = Some(tag.into());
        self
    }

    #[must_use]
    pub const fn array(mut self, is_array: bool) -> Self {
        self.is_array = Some(is_array);
        self
    }

    #[must_use]
    pub const fn preserve_keys(mut self, preserve: bool) -> Self {
        self.preserve_keys = Some(preserve);
        self
    }

    #[must_use]
    pub const fn preserve_only_string_keys(mut self, only_string: bool) -> Self {
        self.preserve_only_string_keys = Some(only_string);
        self
    }

    #[must_use]
    pub const fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    #[must_use]
    pub const fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: impl Into<Literal>) -> Self {
        self.default = Some(value.into());
        self
    }

    #[must_use]
    pub fn enum_values<I, L>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Literal>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.profiles.push(profile.into());
        self
    }

    #[must_use]
    pub fn exclude_profile(mut self, profile: impl Into<String>) -> Self {
        self.exclude_profiles.push(profile.into());
        self
    }

    #[must_use]
    pub fn source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn input_date_format(mut self, format: impl Into<String>) -> Self {
        self.input_date_format = Some(format.into());
        self
    }

    #[must_use]
    pub fn output_date_format(mut self, format: impl Into<String>) -> Self {
        self.output_date_format = Some(format.into());
        self
    }

    #[must_use]
    pub fn inferred(mut self, info: TypeInfo) -> Self {
        self.inferred = Some(info);
        self
    }

    /// Fill unset attributes from an ancestor declaration of the same field.
    pub(crate) fn merge_unset(&mut self, parent: &Self) {
        if self.ty.is_none() {
            self.ty.clone_from(&parent.ty);
            // an inherited explicit type carries its own array flag
            if self.is_array.is_none() {
                self.is_array = parent.is_array;
            }
        }
        if self.is_array.is_none() {
            self.is_array = parent.is_array;
        }
        if self.preserve_keys.is_none() {
            self.preserve_keys = parent.preserve_keys;
        }
        if self.preserve_only_string_keys.is_none() {
            self.preserve_only_string_keys = parent.preserve_only_string_keys;
        }
        if self.nullable.is_none() {
            self.nullable = parent.nullable;
        }
        if self.required.is_none() {
            self.required = parent.required;
        }
        if self.default.is_none() {
            self.default.clone_from(&parent.default);
        }
        if self.enum_values.is_none() {
            self.enum_values.clone_from(&parent.enum_values);
        }
        if self.profiles.is_empty() {
            self.profiles.clone_from(&parent.profiles);
        }
        if self.exclude_profiles.is_empty() {
            self.exclude_profiles.clone_from(&parent.exclude_profiles);
        }
        if self.source_name.is_none() {
            self.source_name.clone_from(&parent.source_name);
        }
        if self.input_date_format.is_none() {
            self.input_date_format.clone_from(&parent.input_date_format);
        }
        if self.output_date_format.is_none() {
            self.output_date_format.clone_from(&parent.output_date_format);
        }
        if self.inferred.is_none() {
            self.inferred.clone_from(&parent.inferred);
        }
    }
}

///
/// ClassDecl
///
/// Declarative class metadata: ordered field declarations plus class-level
/// defaults and an optional parent class for inheritance merging.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ClassDecl {
    pub name: String,
    pub parent: Option<String>,
    pub defaults: ClassDefaults,
    pub fields: Vec<FieldDecl>,
}

impl ClassDecl {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    #[must_use]
    pub fn defaults(mut self, defaults: ClassDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    #[must_use]
    pub fn field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScalarType;

    #[test]
    fn merge_unset_keeps_child_attributes() {
        let parent = FieldDecl::new("status")
            .ty(ScalarType::String)
            .required(true)
            .source_name("status_code");
        let mut child = FieldDecl::new("status").required(false);

        child.merge_unset(&parent);

        assert_eq!(child.ty, Some(TypeTag::Scalar(ScalarType::String)));
        assert_eq!(child.required, Some(false));
        assert_eq!(child.source_name.as_deref(), Some("status_code"));
    }

    #[test]
    fn merge_unset_fills_profiles_only_when_empty() {
        let parent = FieldDecl::new("id").profile("admin");
        let mut child = FieldDecl::new("id").profile("api");

        child.merge_unset(&parent);

        assert_eq!(child.profiles, vec!["api".to_string()]);
    }

    #[test]
    fn class_defaults_merge_prefers_child() {
        let mut child = ClassDefaults {
            required: Some(true),
            ..ClassDefaults::default()
        };
        let parent = ClassDefaults {
            required: Some(false),
            profile: Some("internal".to_string()),
            ..ClassDefaults::default()
        };

        child.merge_unset(&parent);

        assert_eq!(child.required, Some(true));
        assert_eq!(child.profile.as_deref(), Some("internal"));
    }
}
