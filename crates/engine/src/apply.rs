//! Mutation applicator
//!
//! Applies an ordered sequence of [`Change`] descriptors to one document and
//! returns the [`DirtySet`] of top-level fields touched.
//!
//! | Operation | Wire tag | Effect |
//! |-----------|----------|--------|
//! | `Set` | `set` | replace the value at the path |
//! | `SetIdentifier` | `setId` | replace with the value converted to an identifier |
//! | `SetStatus` | `setStatus` | replace with `{code: value, date: now}` |
//! | `Append` | `append` | push onto the array at the path, creating it when absent |
//!
//! Writes may create one missing level of nesting: setting `a.b` on `{}`
//! yields `{a: {b: ..}}`, but setting `a.b.c` on `{}` fails with `NotFound`.
//!
//! Changes are applied in order and a failure aborts the sequence with the
//! document partially mutated. Such a document must not be persisted.

use std::sync::Arc;

use docmend_core::resolve::{self, Resolution};
use docmend_core::{Document, DocumentId, Error, FieldPath, Map, Result, Timestamp, Value};

use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::dirty::DirtySet;

/// Change operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Replace the value at the path
    Set,
    /// Replace the value with an identifier built from it
    SetIdentifier,
    /// Replace the value with a timestamped status record
    SetStatus,
    /// Push onto the array at the path
    Append,
}

impl Operation {
    /// Wire tag of this operation
    pub fn tag(&self) -> &'static str {
        match self {
            Operation::Set => "set",
            Operation::SetIdentifier => "setId",
            Operation::SetStatus => "setStatus",
            Operation::Append => "append",
        }
    }

    /// Parse a wire tag
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "set" => Some(Operation::Set),
            "setId" => Some(Operation::SetIdentifier),
            "setStatus" => Some(Operation::SetStatus),
            "append" => Some(Operation::Append),
            _ => None,
        }
    }
}

/// One edit: a path, an operation, and its value
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    /// Target location
    pub path: FieldPath,
    /// What to do there
    pub operation: Operation,
    /// Operand
    pub value: Value,
}

impl Change {
    /// Create a change
    pub fn new(path: FieldPath, operation: Operation, value: impl Into<Value>) -> Self {
        Change {
            path,
            operation,
            value: value.into(),
        }
    }

    /// `Set` change
    pub fn set(path: FieldPath, value: impl Into<Value>) -> Self {
        Self::new(path, Operation::Set, value)
    }

    /// `SetIdentifier` change
    pub fn set_id(path: FieldPath, value: impl Into<Value>) -> Self {
        Self::new(path, Operation::SetIdentifier, value)
    }

    /// `SetStatus` change
    pub fn set_status(path: FieldPath, code: impl Into<Value>) -> Self {
        Self::new(path, Operation::SetStatus, code)
    }

    /// `Append` change
    pub fn append(path: FieldPath, value: impl Into<Value>) -> Self {
        Self::new(path, Operation::Append, value)
    }

    /// Parse the wire form `{"path": "a.b", "<tag>": value}`
    ///
    /// The object must carry a `path` and exactly one operation tag.
    pub fn from_value(raw: &Value) -> Result<Self> {
        let Value::Object(map) = raw else {
            return Err(Error::invalid_operation(format!(
                "change must be an object, found {}",
                raw.type_name()
            )));
        };

        let path = match map.get("path") {
            None => return Err(Error::missing_field("path")),
            Some(Value::String(s)) if s.is_empty() => return Err(Error::missing_field("path")),
            Some(Value::String(s)) => FieldPath::parse(s)?,
            Some(other) => {
                return Err(Error::invalid_operation(format!(
                    "path must be a string, found {}",
                    other.type_name()
                )))
            }
        };

        let mut operations = map.iter().filter(|(key, _)| key.as_str() != "path");
        let (tag, value) = match (operations.next(), operations.next()) {
            (Some(single), None) => single,
            (None, _) => {
                return Err(Error::invalid_operation(format!(
                    "change at '{}' carries no operation",
                    path
                )))
            }
            (Some(_), Some(_)) => {
                return Err(Error::invalid_operation(format!(
                    "change at '{}' must carry exactly one operation",
                    path
                )))
            }
        };

        let operation = Operation::from_tag(tag).ok_or_else(|| {
            Error::invalid_operation(format!("unrecognized operation '{}'", tag))
        })?;

        Ok(Change {
            path,
            operation,
            value: value.clone(),
        })
    }

    /// Parse a single change object or an array of them
    pub fn parse_all(raw: &Value) -> Result<Vec<Self>> {
        match raw {
            Value::Array(items) => items.iter().map(Self::from_value).collect(),
            single => Ok(vec![Self::from_value(single)?]),
        }
    }
}

/// Applies changes and array operations to documents
///
/// Holds the field-name conventions of the store and the clock status
/// records are stamped with.
#[derive(Clone)]
pub struct Mutator {
    pub(crate) id_field: String,
    status_code_field: String,
    status_date_field: String,
    pub(crate) default_locale: String,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for Mutator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mutator")
            .field("id_field", &self.id_field)
            .field("status_code_field", &self.status_code_field)
            .field("status_date_field", &self.status_date_field)
            .field("default_locale", &self.default_locale)
            .finish()
    }
}

impl Default for Mutator {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl Mutator {
    /// Create a mutator from configuration, using the wall clock
    pub fn new(config: &EngineConfig) -> Self {
        Mutator {
            id_field: config.id_field.clone(),
            status_code_field: config.status_code_field.clone(),
            status_date_field: config.status_date_field.clone(),
            default_locale: config.default_locale.clone(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock (builder pattern)
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Identifier field used for selectors and identity guards
    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    /// Apply `changes` in order
    ///
    /// An empty sequence leaves the document untouched and returns an empty
    /// set.
    pub fn apply(&self, document: &mut Document, changes: &[Change]) -> Result<DirtySet> {
        let mut dirty = DirtySet::new();
        for change in changes {
            self.apply_one(document, change)?;
            dirty.touch(&change.path);
        }
        Ok(dirty)
    }

    fn apply_one(&self, document: &mut Document, change: &Change) -> Result<()> {
        let path = &change.path;
        match change.operation {
            Operation::Set => {
                self.guard_identity(change)?;
                self.assign(document, path, change.value.clone())
            }
            Operation::SetIdentifier => {
                let id = DocumentId::from_value(&change.value)?;
                self.assign(document, path, Value::Id(id))
            }
            Operation::SetStatus => {
                self.guard_identity_path(change)?;
                let record = self.status_record(change.value.clone(), self.clock.now());
                self.assign(document, path, record)
            }
            Operation::Append => {
                self.guard_identity(change)?;
                self.push(document, path, change.value.clone())
            }
        }
    }

    fn status_record(&self, code: Value, date: Timestamp) -> Value {
        Value::Object(Map::from([
            (self.status_code_field.clone(), code),
            (self.status_date_field.clone(), Value::Timestamp(date)),
        ]))
    }

    // The identifier field is written only by SetIdentifier
    fn guard_identity_path(&self, change: &Change) -> Result<()> {
        let targets_id = change.path.top_level() == Some(self.id_field.as_str())
            || change.path.last_key() == Some(self.id_field.as_str());
        if targets_id {
            return Err(Error::invalid_operation(format!(
                "'{}' can only be written with {}",
                change.path,
                Operation::SetIdentifier.tag()
            )));
        }
        Ok(())
    }

    // Identifier-typed values are written only by SetIdentifier
    fn guard_identity(&self, change: &Change) -> Result<()> {
        self.guard_identity_path(change)?;
        if change.value.contains_id() {
            return Err(Error::invalid_operation(format!(
                "{} at '{}' carries an identifier value; use {}",
                change.operation.tag(),
                change.path,
                Operation::SetIdentifier.tag()
            )));
        }
        Ok(())
    }

    /// Write `value` at `path`, creating at most one missing level
    pub(crate) fn assign(&self, document: &mut Document, path: &FieldPath, value: Value) -> Result<()> {
        let missing_from = match resolve::resolve_mut(document, path, &self.id_field)? {
            Resolution::Found(slot) => {
                slot.write(value);
                return Ok(());
            }
            Resolution::Absent { missing_from } => missing_from,
        };
        self.create_parent(document, path, missing_from, value)
    }

    fn push(&self, document: &mut Document, path: &FieldPath, value: Value) -> Result<()> {
        let missing_from = match resolve::resolve_mut(document, path, &self.id_field)? {
            Resolution::Found(slot) => {
                match slot.get().map(|v| (v.is_array(), v.type_name())) {
                    None => {
                        slot.write(Value::Array(vec![value]));
                    }
                    Some((true, _)) => {
                        if let Some(items) = slot.into_mut().and_then(Value::as_array_mut) {
                            items.push(value);
                        }
                    }
                    Some((false, found)) => {
                        return Err(Error::TypeMismatch {
                            path: path.to_string(),
                            expected: "array",
                            found,
                        });
                    }
                }
                return Ok(());
            }
            Resolution::Absent { missing_from } => missing_from,
        };
        self.create_parent(document, path, missing_from, Value::Array(vec![value]))
    }

    // `missing_from` indexes the first absent segment; only the direct
    // parent of the final segment may be materialized.
    fn create_parent(
        &self,
        document: &mut Document,
        path: &FieldPath,
        missing_from: usize,
        value: Value,
    ) -> Result<()> {
        let missing = || {
            Error::not_found(format!(
                "path '{}' (no field '{}')",
                path,
                path.prefix(missing_from + 1)
            ))
        };
        if missing_from + 2 != path.len() {
            return Err(missing());
        }
        let Some(key) = path.last_key() else {
            return Err(missing());
        };

        let parent = path.prefix(path.len() - 1);
        match resolve::resolve_mut(document, &parent, &self.id_field)? {
            Resolution::Found(slot) => {
                slot.write(Value::Object(Map::from([(key.to_string(), value)])));
                Ok(())
            }
            Resolution::Absent { .. } => Err(missing()),
        }
    }
}

/// Apply changes with the default configuration
pub fn apply(document: &mut Document, changes: &[Change]) -> Result<DirtySet> {
    Mutator::default().apply(document, changes)
}
