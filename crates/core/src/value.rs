//! Value types for docmend
//!
//! [`Value`] is the schema-less value model every document is built from.
//! It has nine variants:
//! - Scalars: `Null`, `Bool`, `Int`, `Float`, `String`
//! - Store scalars: `Id` (store identifier), `Timestamp`
//! - Containers: `Array` (ordered sequence), `Object` (mapping)
//!
//! ## Type Rules
//!
//! - No implicit coercions: `Int(1) != Float(1.0)`, `String(hex) != Id(..)`
//! - Float uses IEEE-754 equality: `NaN != NaN`, `-0.0 == 0.0`
//!
//! JSON is a strict subset: converting to `serde_json::Value` renders `Id`
//! as its hex string and `Timestamp` as RFC 3339, so the conversion is lossy
//! in that direction only.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::id::DocumentId;
use crate::timestamp::Timestamp;

/// Mapping type used for objects and document bodies
pub type Map = BTreeMap<String, Value>;

/// Schema-less document value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point (IEEE-754)
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Store identifier
    Id(DocumentId),
    /// Point in time
    Timestamp(Timestamp),
    /// Ordered sequence of values
    Array(Vec<Value>),
    /// Mapping with string keys
    Object(Map),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            // IEEE-754: NaN != NaN, -0.0 == 0.0
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Id(a), Value::Id(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    /// Create an empty object
    pub fn object() -> Self {
        Value::Object(Map::new())
    }

    /// Create an empty array
    pub fn array() -> Self {
        Value::Array(Vec::new())
    }

    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Id(_) => "id",
            Value::Timestamp(_) => "timestamp",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this is an array value
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Check if this is an object value
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Check if this is a scalar (neither array nor object)
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Value::Array(_) | Value::Object(_))
    }

    /// Get as i64 if this is an Int value
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as &str if this is a String value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the identifier if this is an Id value
    pub fn as_id(&self) -> Option<DocumentId> {
        match self {
            Value::Id(id) => Some(*id),
            _ => None,
        }
    }

    /// Get as slice if this is an Array value
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Get as mutable vector if this is an Array value
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Get as map if this is an Object value
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Get as mutable map if this is an Object value
    pub fn as_object_mut(&mut self) -> Option<&mut Map> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Whether an `Id` appears anywhere inside this value
    pub fn contains_id(&self) -> bool {
        match self {
            Value::Id(_) => true,
            Value::Array(items) => items.iter().any(Value::contains_id),
            Value::Object(map) => map.values().any(Value::contains_id),
            _ => false,
        }
    }

    /// The identifier this value carries, stringified
    ///
    /// An `Id` is its own identifier; an object is identified by its
    /// `id_field`. Anything else has no identifier.
    pub fn identity(&self, id_field: &str) -> Option<String> {
        match self {
            Value::Id(id) => Some(id.to_hex()),
            Value::Object(map) => match map.get(id_field)? {
                Value::Id(id) => Some(id.to_hex()),
                Value::String(s) => Some(s.clone()),
                Value::Int(i) => Some(i.to_string()),
                _ => None,
            },
            _ => None,
        }
    }

    /// Scalar rendered as text, `None` for null and containers
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Value::Bool(b) => Some(b.to_string()),
            Value::Int(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::String(s) => Some(s.clone()),
            Value::Id(id) => Some(id.to_hex()),
            Value::Timestamp(ts) => Some(ts.to_rfc3339()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", serde_json::Value::from(self.clone()))
    }
}

// ============================================================================
// From implementations for ergonomic API usage
// ============================================================================

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<DocumentId> for Value {
    fn from(id: DocumentId) -> Self {
        Value::Id(id)
    }
}

impl From<Timestamp> for Value {
    fn from(ts: Timestamp) -> Self {
        Value::Timestamp(ts)
    }
}

impl From<Vec<Value>> for Value {
    fn from(a: Vec<Value>) -> Self {
        Value::Array(a)
    }
}

impl From<Map> for Value {
    fn from(o: Map) -> Self {
        Value::Object(o)
    }
}

// ============================================================================
// serde_json interop
// ============================================================================

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    // u64 beyond i64 range degrades to float
                    Value::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(arr) => {
                Value::Array(arr.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => {
                Value::Object(obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Int(i) => serde_json::Value::Number(i.into()),
            Value::Float(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s),
            Value::Id(id) => serde_json::Value::String(id.to_hex()),
            Value::Timestamp(ts) => serde_json::Value::String(ts.to_rfc3339()),
            Value::Array(arr) => {
                serde_json::Value::Array(arr.into_iter().map(serde_json::Value::from).collect())
            }
            Value::Object(obj) => serde_json::Value::Object(
                obj.into_iter()
                    .map(|(k, v)| (k, serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_int_not_equal_float() {
        assert_ne!(Value::Int(1), Value::Float(1.0));
    }

    #[test]
    fn test_id_not_equal_its_hex_string() {
        let id = DocumentId::new();
        assert_ne!(Value::Id(id), Value::String(id.to_hex()));
    }

    #[test]
    fn test_float_ieee_equality() {
        assert_ne!(Value::Float(f64::NAN), Value::Float(f64::NAN));
        assert_eq!(Value::Float(0.0), Value::Float(-0.0));
    }

    #[test]
    fn test_from_json_nested() {
        let v = Value::from(json!({"tags": ["a", "b"], "n": 3, "ok": true}));
        let obj = v.as_object().unwrap();
        assert_eq!(
            obj.get("tags"),
            Some(&Value::Array(vec![Value::from("a"), Value::from("b")]))
        );
        assert_eq!(obj.get("n"), Some(&Value::Int(3)));
        assert_eq!(obj.get("ok"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_to_json_renders_store_scalars_as_strings() {
        let id = DocumentId::from_bytes([1; 16]);
        let v = Value::Object(Map::from([
            ("_id".to_string(), Value::Id(id)),
            ("at".to_string(), Value::Timestamp(Timestamp::from_secs(0))),
        ]));
        let j = serde_json::Value::from(v);
        assert_eq!(j["_id"], json!("01".repeat(16)));
        assert_eq!(j["at"], json!("1970-01-01T00:00:00.000000Z"));
    }

    #[test]
    fn test_contains_id() {
        let id = DocumentId::new();
        assert!(!Value::from(json!({"a": [1, {"b": "c"}]})).contains_id());
        let nested = Value::Array(vec![Value::object(), Value::Array(vec![Value::Id(id)])]);
        assert!(nested.contains_id());
    }

    #[test]
    fn test_identity() {
        let id = DocumentId::new();
        assert_eq!(Value::Id(id).identity("_id"), Some(id.to_hex()));

        let obj = Value::Object(Map::from([("_id".to_string(), Value::Id(id))]));
        assert_eq!(obj.identity("_id"), Some(id.to_hex()));

        let int_keyed = Value::from(json!({"id": 7}));
        assert_eq!(int_keyed.identity("id"), Some("7".to_string()));
        assert_eq!(int_keyed.identity("_id"), None);

        assert_eq!(Value::from("plain").identity("_id"), None);
    }

    #[test]
    fn test_scalar_text() {
        assert_eq!(Value::from("x").scalar_text(), Some("x".to_string()));
        assert_eq!(Value::Int(4).scalar_text(), Some("4".to_string()));
        assert_eq!(Value::Null.scalar_text(), None);
        assert_eq!(Value::array().scalar_text(), None);
    }

    #[test]
    fn test_serde_round_trip_preserves_store_scalars() {
        let value = Value::Array(vec![
            Value::Id(DocumentId::new()),
            Value::Timestamp(Timestamp::from_micros(12)),
            Value::Float(1.5),
        ]);
        let s = serde_json::to_string(&value).unwrap();
        let back: Value = serde_json::from_str(&s).unwrap();
        assert_eq!(value, back);
    }

    #[test]
    fn test_display_is_json() {
        let v = Value::from(json!({"a": [1, 2]}));
        assert_eq!(v.to_string(), r#"{"a":[1,2]}"#);
    }
}
