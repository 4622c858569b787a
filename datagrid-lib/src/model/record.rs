//! Dynamic row record

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

/// A single row delivered by the backend.
///
/// Rows are plain JSON objects. Nested columns are looked up by dotted path,
/// so a column `data.energy.value` reads `{"data": {"energy": {"value": 1}}}`.
///
/// # Example
///
/// ```
/// use datagrid_lib::model::Record;
/// use serde_json::json;
///
/// let record = Record::from_value(json!({"data": {"energy": {"value": 3.5}}})).unwrap();
/// assert_eq!(record.get("data.energy.value"), Some(&json!(3.5)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a JSON value, returning `None` if it is not an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    /// Sets a top-level field.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Resolves a dotted path.
    ///
    /// Nested objects are walked first; a literal key containing dots is the
    /// fallback for backends that flatten nested fields.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.fields.get(first);
        for segment in segments {
            current = current.and_then(|v| v.as_object()).and_then(|o| o.get(segment));
        }
        current.or_else(|| self.fields.get(path))
    }

    /// The `id` field as a string, when present.
    pub fn id(&self) -> Option<&str> {
        self.fields.get("id").and_then(Value::as_str)
    }

    /// The raw top-level fields.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_get_nested_and_flat() {
        let record = Record::from_value(json!({
            "name": "mp-1",
            "data": {"energy": {"value": -1.5}},
            "meta.source": "flat"
        }))
        .unwrap();

        assert_eq!(record.get("name"), Some(&json!("mp-1")));
        assert_eq!(record.get("data.energy.value"), Some(&json!(-1.5)));
        assert_eq!(record.get("meta.source"), Some(&json!("flat")));
        assert_eq!(record.get("data.energy.missing"), None);
        assert_eq!(record.get("name.deeper"), None);
    }

    #[test]
    fn test_from_value_rejects_non_objects() {
        assert!(Record::from_value(json!([1, 2])).is_none());
        assert!(Record::from_value(json!("x")).is_none());
    }
}
