//! Decoded command documents.
//!
//! A [`CommandDocument`] is the JSON object carried by an inbound command.
//! The registry only interprets `name` and `parameter`; every other field
//! belongs to peripheral and task factories.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field holding the peripheral name.
pub const NAME_FIELD: &str = "name";

/// Field holding the task parameter payload.
pub const PARAMETER_FIELD: &str = "parameter";

/// Field selecting the task kind on `execute`.
pub const TASK_FIELD: &str = "task";

/// Field selecting the peripheral type on `add`.
pub const TYPE_FIELD: &str = "type";

/// A decoded command document.
///
/// Deserialisation only accepts JSON objects, so malformed or scalar
/// payloads are rejected before they reach the registry.
///
/// # Example
///
/// ```
/// use periphery_registry::CommandDocument;
/// use serde_json::json;
///
/// let document = CommandDocument::try_from(json!({"name": "led0", "parameter": {}}))
///     .expect("object document");
/// assert_eq!(document.name(), Some("led0"));
/// assert!(document.parameter().is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandDocument {
    fields: Map<String, Value>,
}

impl CommandDocument {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the `name` field when it is present and a string.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.str_field(NAME_FIELD)
    }

    /// Returns the `parameter` field unless it is absent or `null`.
    #[must_use]
    pub fn parameter(&self) -> Option<&Value> {
        self.fields.get(PARAMETER_FIELD).filter(|value| !value.is_null())
    }

    /// Returns the `task` selector when present and a string.
    #[must_use]
    pub fn task(&self) -> Option<&str> {
        self.str_field(TASK_FIELD)
    }

    /// Returns the `type` selector when present and a string.
    #[must_use]
    pub fn peripheral_type(&self) -> Option<&str> {
        self.str_field(TYPE_FIELD)
    }

    /// Returns a raw field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Returns a field when it is a string.
    #[must_use]
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Returns a field when it is an unsigned integer.
    #[must_use]
    pub fn u64_field(&self, key: &str) -> Option<u64> {
        self.fields.get(key).and_then(Value::as_u64)
    }

    /// Returns a field when it is a boolean.
    #[must_use]
    pub fn bool_field(&self, key: &str) -> Option<bool> {
        self.fields.get(key).and_then(Value::as_bool)
    }

    /// Sets a field, replacing any previous value.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Returns the underlying object.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl From<Map<String, Value>> for CommandDocument {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl TryFrom<Value> for CommandDocument {
    type Error = Value;

    /// Accepts JSON objects and hands any other value back unchanged.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(other),
        }
    }
}
