//! Documents and structural access
//!
//! A [`Document`] is one schema-less record: an unordered mapping from field
//! name to [`Value`]. Documents also carry the set of top-level fields that
//! have been marked modified since they were fetched. Stores that persist
//! changes field-by-field consult this set when saving; it is never
//! serialized.
//!
//! [`Structural`] is the small capability the resolver needs from a root:
//! a view of it as a mapping, a sequence, or a scalar. Both `Document` and
//! `Value` implement it, so traversal never assumes a concrete container.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::id::DocumentId;
use crate::value::{Map, Value};

/// Default name of the identifier field
pub const ID_FIELD: &str = "_id";

/// Read-only view of a structural node
#[derive(Debug, Clone, Copy)]
pub enum Container<'a> {
    /// Field mapping
    Mapping(&'a Map),
    /// Ordered sequence
    Sequence(&'a [Value]),
    /// Scalar of the named type
    Scalar(&'static str),
}

/// Mutable view of a structural node
#[derive(Debug)]
pub enum ContainerMut<'a> {
    /// Field mapping
    Mapping(&'a mut Map),
    /// Ordered sequence
    Sequence(&'a mut Vec<Value>),
    /// Scalar of the named type
    Scalar(&'static str),
}

/// Get/set-by-key and get/set-by-index access over arbitrary shapes
pub trait Structural {
    /// View this node as a container
    fn container(&self) -> Container<'_>;

    /// View this node as a mutable container
    fn container_mut(&mut self) -> ContainerMut<'_>;
}

impl Structural for Value {
    fn container(&self) -> Container<'_> {
        match self {
            Value::Object(map) => Container::Mapping(map),
            Value::Array(items) => Container::Sequence(items),
            other => Container::Scalar(other.type_name()),
        }
    }

    fn container_mut(&mut self) -> ContainerMut<'_> {
        match self {
            Value::Object(map) => ContainerMut::Mapping(map),
            Value::Array(items) => ContainerMut::Sequence(items),
            other => ContainerMut::Scalar(other.type_name()),
        }
    }
}

/// A schema-less record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    fields: Map,
    #[serde(skip)]
    modified: BTreeSet<String>,
}

// Modification marks are bookkeeping, not content
impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl Structural for Document {
    fn container(&self) -> Container<'_> {
        Container::Mapping(&self.fields)
    }

    fn container_mut(&mut self) -> ContainerMut<'_> {
        ContainerMut::Mapping(&mut self.fields)
    }
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from a field mapping
    pub fn from_fields(fields: Map) -> Self {
        Document {
            fields,
            modified: BTreeSet::new(),
        }
    }

    /// Create a document from a value, which must be an object
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self::from_fields(fields)),
            other => Err(Error::TypeMismatch {
                path: String::new(),
                expected: "object",
                found: other.type_name(),
            }),
        }
    }

    /// Create a document from JSON, which must be an object
    pub fn from_json(json: serde_json::Value) -> Result<Self> {
        Self::from_value(Value::from(json))
    }

    /// Get a top-level field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Get a mutable top-level field
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.fields.get_mut(key)
    }

    /// Insert a top-level field, returning the previous value
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(key.into(), value)
    }

    /// Remove a top-level field
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    /// Check whether a top-level field exists
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// All top-level fields
    pub fn fields(&self) -> &Map {
        &self.fields
    }

    /// Number of top-level fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check whether the document has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Identifier stored under the default identifier field
    pub fn id(&self) -> Option<DocumentId> {
        self.id_of(ID_FIELD)
    }

    /// Identifier stored under `id_field`
    pub fn id_of(&self, id_field: &str) -> Option<DocumentId> {
        self.fields.get(id_field).and_then(Value::as_id)
    }

    /// Record that a top-level field changed in place
    pub fn mark_modified(&mut self, field: impl Into<String>) {
        self.modified.insert(field.into());
    }

    /// Check whether a top-level field has been marked modified
    pub fn is_modified(&self, field: &str) -> bool {
        self.modified.contains(field)
    }

    /// Fields marked modified, in name order
    pub fn modified_fields(&self) -> impl Iterator<Item = &str> {
        self.modified.iter().map(String::as_str)
    }

    /// Forget all modification marks
    pub fn clear_modified(&mut self) {
        self.modified.clear();
    }

    /// The document as an object value
    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }

    /// Consume into an object value
    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    /// The document as JSON
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::from(self.to_value())
    }
}

impl From<Map> for Document {
    fn from(fields: Map) -> Self {
        Document::from_fields(fields)
    }
}
