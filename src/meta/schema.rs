//! Structured-data payload for the JSON-LD `<script>` block.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Failure to turn a value into a JSON-LD payload.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema value is not JSON-serializable")]
    Serialize(#[source] serde_json::Error),

    #[error("schema must be a JSON object or array, got {0}")]
    NotStructured(&'static str),
}

/// A validated JSON-LD payload.
///
/// Holds a plain JSON tree (null, bool, number, string, array, object),
/// so serializing it again cannot fail. Construction is the only fallible
/// step.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema(Value);

impl Schema {
    /// Convert any serializable value into a schema payload.
    ///
    /// Top-level scalars are rejected: a structured-data block describes an
    /// entity (object) or a list of them (array, e.g. `@graph` style).
    pub fn new<T: Serialize>(value: T) -> Result<Self, SchemaError> {
        let value = serde_json::to_value(value).map_err(SchemaError::Serialize)?;
        Self::from_value(value)
    }

    /// Wrap an existing JSON tree.
    pub fn from_value(value: Value) -> Result<Self, SchemaError> {
        match value {
            Value::Object(_) | Value::Array(_) => Ok(Self(value)),
            other => Err(SchemaError::NotStructured(kind_name(&other))),
        }
    }

    /// The JSON tree.
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Compact JSON text, as embedded in the page.
    pub fn to_json(&self) -> String {
        // `Value`'s Display is compact serialization and cannot fail.
        self.0.to_string()
    }

    /// Value of the `@type` key, when the payload is an object carrying one.
    pub fn schema_type(&self) -> Option<&str> {
        self.0.get("@type").and_then(Value::as_str)
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json())
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(serde::de::Error::custom)
    }
}

impl TryFrom<Value> for Schema {
    type Error = SchemaError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_schema_from_json_object() {
        let schema = Schema::new(json!({"@type": "Organization", "name": "Acme"})).unwrap();
        assert_eq!(schema.schema_type(), Some("Organization"));
        assert_eq!(schema.to_json(), r#"{"@type":"Organization","name":"Acme"}"#);
    }

    #[test]
    fn test_schema_from_struct() {
        #[derive(Serialize)]
        struct Org {
            #[serde(rename = "@type")]
            kind: &'static str,
            name: &'static str,
        }

        let schema = Schema::new(Org {
            kind: "Organization",
            name: "Acme",
        })
        .unwrap();
        assert_eq!(schema.value(), &json!({"@type": "Organization", "name": "Acme"}));
    }

    #[test]
    fn test_schema_rejects_scalar() {
        let err = Schema::new("just a string").unwrap_err();
        assert!(matches!(err, SchemaError::NotStructured("string")));
        assert!(Schema::new(42).is_err());
        assert!(Schema::from_value(Value::Null).is_err());
    }

    #[test]
    fn test_schema_rejects_unserializable() {
        // JSON object keys must be strings
        let mut map = HashMap::new();
        map.insert(vec![1u8], "x");
        let err = Schema::new(map).unwrap_err();
        assert!(matches!(err, SchemaError::Serialize(_)));
    }

    #[test]
    fn test_schema_array_allowed() {
        let schema = Schema::new(json!([{"@type": "WebPage"}])).unwrap();
        assert_eq!(schema.schema_type(), None);
    }

    #[test]
    fn test_schema_deserialize_validates() {
        let ok: Result<Schema, _> = serde_json::from_str(r#"{"@type":"Article"}"#);
        assert!(ok.is_ok());
        let bad: Result<Schema, _> = serde_json::from_str("true");
        assert!(bad.is_err());
    }

    #[test]
    fn test_schema_keeps_key_order() {
        let schema: Schema =
            serde_json::from_str(r#"{"name":"Acme","@context":"https://schema.org"}"#).unwrap();
        assert_eq!(schema.to_json(), r#"{"name":"Acme","@context":"https://schema.org"}"#);
    }
}
