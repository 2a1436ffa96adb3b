use crate::value::Value;
use std::collections::HashMap;

///
/// FieldMeta
///
/// Per-field hydration record: the source key the value was actually mapped
/// from, and the value snapshot taken right after assignment.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldMeta {
    pub mapped_from: Option<String>,
    pub init_value: Option<Value>,
}

///
/// InstanceMetadata
///
/// Owned by each hydrated object, never shared across instances. Rebuilt
/// from scratch on every hydration or collection pass; consumed by the
/// serializer for alias naming and dirty detection.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InstanceMetadata {
    fields: HashMap<String, FieldMeta>,
}

impl InstanceMetadata {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }

    pub fn set_mapped_from(&mut self, field: &str, source: impl Into<String>) {
        self.entry(field).mapped_from = Some(source.into());
    }

    pub fn set_init_value(&mut self, field: &str, value: Value) {
        self.entry(field).init_value = Some(value);
    }

    #[must_use]
    pub fn mapped_from(&self, field: &str) -> Option<&str> {
        self.fields.get(field)?.mapped_from.as_deref()
    }

    #[must_use]
    pub fn init_value(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)?.init_value.as_ref()
    }

    fn entry(&mut self, field: &str) -> &mut FieldMeta {
        self.fields.entry(field.to_string()).or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_are_per_field() {
        let mut meta = InstanceMetadata::new();
        meta.set_mapped_from("firstName", "first_name");
        meta.set_init_value("firstName", Value::from("Ann"));

        assert_eq!(meta.mapped_from("firstName"), Some("first_name"));
        assert_eq!(meta.init_value("firstName"), Some(&Value::from("Ann")));
        assert_eq!(meta.mapped_from("lastName"), None);
    }

    #[test]
    fn clear_discards_previous_pass() {
        let mut meta = InstanceMetadata::new();
        meta.set_init_value("a", Value::Int(1));
        meta.clear();

        assert_eq!(meta.init_value("a"), None);
    }
}
