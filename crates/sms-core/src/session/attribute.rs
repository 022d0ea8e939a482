use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Upserts one named value into a session's attribute store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionAttribute {
    name: String,
    value: Value,
}

impl SessionAttribute {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_parts(self) -> (String, Value) {
        (self.name, self.value)
    }
}
