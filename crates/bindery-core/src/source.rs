use crate::value::{Value, from_json};
use std::collections::{BTreeMap, HashMap};

///
/// RawSource
///
/// A named-value source feeding hydration: an associative structure or
/// anything exposing getter-style access by key.
///

pub trait RawSource {
    /// Fetch the value stored under `key`, if any. `Some(Value::Null)` and
    /// `None` are distinct: an explicit null is present.
    fn get_value(&self, key: &str) -> Option<Value>;
}

impl RawSource for Value {
    fn get_value(&self, key: &str) -> Option<Value> {
        self.get(key).cloned()
    }
}

impl RawSource for serde_json::Value {
    fn get_value(&self, key: &str) -> Option<Value> {
        self.as_object()?.get(key).map(from_json)
    }
}

impl RawSource for HashMap<String, Value> {
    fn get_value(&self, key: &str) -> Option<Value> {
        self.get(key).cloned()
    }
}

impl RawSource for BTreeMap<String, Value> {
    fn get_value(&self, key: &str) -> Option<Value> {
        self.get(key).cloned()
    }
}
