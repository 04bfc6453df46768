//! Array operations
//!
//! Each operation targets one array-valued field of one document, addressed
//! by a [`FieldPath`] that may select elements of enclosing arrays by
//! identifier:
//!
//! - [`Mutator::append_with_ids`]: push a value, converting it or some of
//!   its fields to identifiers first
//! - [`Mutator::inject`]: push values at nested depth; `enum_opts` targets
//!   receive localized-text records
//! - [`Mutator::duplicate`]: append a deep copy of every element
//! - [`Mutator::find_duplicates`] / [`Mutator::dedupe`]: report or remove
//!   elements whose key was already seen
//! - [`Mutator::remove_element`]: splice out one selected element
//!
//! Append and inject are no-ops on an absent or non-array field. Duplicate
//! and dedupe report a count, so they fail with `NotAnArray` there instead.

use std::collections::HashSet;

use docmend_core::resolve::{self, Resolution, Slot};
use docmend_core::{Document, DocumentId, Error, FieldPath, Map, Result, Value};

use crate::apply::Mutator;
use crate::dirty::DirtySet;

/// Target field whose injected scalars are wrapped as localized text
pub const LOCALIZED_OPTIONS_FIELD: &str = "enum_opts";

/// Which parts of an appended value become identifiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Substitution {
    /// The value itself
    Value,
    /// The named fields of an object value
    Fields(Vec<String>),
}

/// Outcome of a duplicate scan
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DedupeReport {
    /// Elements before deduplication
    pub original_count: usize,
    /// Elements after deduplication
    pub deduplicated_count: usize,
    /// Elements whose key was already seen, in original order
    pub duplicates: Vec<Value>,
}

enum ArrayTarget<'d> {
    Array(&'d mut Vec<Value>),
    // Type name of what is there instead, "absent" when nothing is
    Other(&'static str),
}

impl Mutator {
    fn array_target<'d>(&self, document: &'d mut Document, path: &FieldPath) -> Result<ArrayTarget<'d>> {
        match resolve::resolve_mut(document, path, &self.id_field)? {
            Resolution::Found(slot) => Ok(match slot.into_mut() {
                Some(Value::Array(items)) => ArrayTarget::Array(items),
                Some(other) => ArrayTarget::Other(other.type_name()),
                None => ArrayTarget::Other("absent"),
            }),
            Resolution::Absent { .. } => Ok(ArrayTarget::Other("absent")),
        }
    }

    fn require_array<'d>(&self, document: &'d mut Document, path: &FieldPath) -> Result<&'d mut Vec<Value>> {
        match self.array_target(document, path)? {
            ArrayTarget::Array(items) => Ok(items),
            ArrayTarget::Other(found) => Err(Error::NotAnArray {
                path: path.to_string(),
                found,
            }),
        }
    }

    /// Push `value`, converting identifiers as `substitution` says
    pub fn append_with_ids(
        &self,
        document: &mut Document,
        path: &FieldPath,
        value: Value,
        substitution: Option<&Substitution>,
    ) -> Result<DirtySet> {
        let ArrayTarget::Array(items) = self.array_target(document, path)? else {
            return Ok(DirtySet::new());
        };

        let value = match substitution {
            None => value,
            Some(Substitution::Value) => Value::Id(DocumentId::from_value(&value)?),
            Some(Substitution::Fields(names)) => substitute_fields(path, value, names)?,
        };
        items.push(value);

        let mut dirty = DirtySet::new();
        dirty.touch(path);
        Ok(dirty)
    }

    /// Push every value onto the array at `path`
    ///
    /// When the path ends in `enum_opts`, each scalar is wrapped as
    /// `{<locale>: "<text>"}`, with `locale` defaulting to the configured one.
    pub fn inject(
        &self,
        document: &mut Document,
        path: &FieldPath,
        values: Vec<Value>,
        locale: Option<&str>,
    ) -> Result<DirtySet> {
        let localized = path.last_key() == Some(LOCALIZED_OPTIONS_FIELD);
        let locale = locale.unwrap_or(self.default_locale.as_str()).to_string();

        let ArrayTarget::Array(items) = self.array_target(document, path)? else {
            return Ok(DirtySet::new());
        };
        if values.is_empty() {
            return Ok(DirtySet::new());
        }

        for value in values {
            if localized {
                items.push(localize(value, &locale));
            } else {
                items.push(value);
            }
        }

        let mut dirty = DirtySet::new();
        dirty.touch(path);
        Ok(dirty)
    }

    /// Append a deep copy of every element, returning the new length
    pub fn duplicate(&self, document: &mut Document, path: &FieldPath) -> Result<(DirtySet, usize)> {
        let items = self.require_array(document, path)?;
        let copies = items.clone();
        items.extend(copies);
        let length = items.len();

        let mut dirty = DirtySet::new();
        dirty.touch(path);
        Ok((dirty, length))
    }

    /// Report duplicates without removing them
    pub fn find_duplicates(
        &self,
        document: &Document,
        path: &FieldPath,
        key: Option<&str>,
    ) -> Result<DedupeReport> {
        let items = match resolve::get(document, path, &self.id_field)? {
            Some(Value::Array(items)) => items,
            other => {
                return Err(Error::NotAnArray {
                    path: path.to_string(),
                    found: other.map(Value::type_name).unwrap_or("absent"),
                })
            }
        };

        let flags = self.duplicate_flags(items, key);
        let duplicates: Vec<Value> = items
            .iter()
            .zip(&flags)
            .filter(|(_, dup)| **dup)
            .map(|(item, _)| item.clone())
            .collect();

        Ok(DedupeReport {
            original_count: items.len(),
            deduplicated_count: items.len() - duplicates.len(),
            duplicates,
        })
    }

    /// Keep the first element per key, dropping later ones
    pub fn dedupe(
        &self,
        document: &mut Document,
        path: &FieldPath,
        key: Option<&str>,
    ) -> Result<(DirtySet, DedupeReport)> {
        let items = self.require_array(document, path)?;
        let flags = self.duplicate_flags(items, key);

        let original = std::mem::take(items);
        let original_count = original.len();
        let mut duplicates = Vec::new();
        for (item, dup) in original.into_iter().zip(flags) {
            if dup {
                duplicates.push(item);
            } else {
                items.push(item);
            }
        }

        let report = DedupeReport {
            original_count,
            deduplicated_count: items.len(),
            duplicates,
        };
        let mut dirty = DirtySet::new();
        dirty.touch(path);
        Ok((dirty, report))
    }

    /// Splice out the array element the path's last segment selects
    ///
    /// The container of the final segment must be an array; a mapping there
    /// fails with `TypeMismatch`.
    pub fn remove_element(&self, document: &mut Document, path: &FieldPath) -> Result<(DirtySet, Value)> {
        let removed = match resolve::resolve_mut(document, path, &self.id_field)? {
            Resolution::Found(Slot::Element { array, index }) => array.remove(index),
            Resolution::Found(Slot::Field { .. }) => {
                return Err(Error::TypeMismatch {
                    path: path.parent().unwrap_or_default().to_string(),
                    expected: "array",
                    found: "object",
                })
            }
            Resolution::Absent { .. } => {
                return Err(Error::not_found(format!("path '{}'", path)));
            }
        };

        let mut dirty = DirtySet::new();
        dirty.touch(path);
        Ok((dirty, removed))
    }

    fn duplicate_flags(&self, items: &[Value], key: Option<&str>) -> Vec<bool> {
        duplicate_flags(items, key, &self.id_field)
    }
}

// Per element: true when an earlier element had the same key
fn duplicate_flags(items: &[Value], key: Option<&str>, id_field: &str) -> Vec<bool> {
    let mut seen = HashSet::new();
    items
        .iter()
        .map(|item| match dedupe_key(item, key, id_field) {
            Some(k) => !seen.insert(k),
            None => false,
        })
        .collect()
}

fn dedupe_key(item: &Value, key: Option<&str>, id_field: &str) -> Option<String> {
    match key {
        None => item.identity(id_field),
        Some(field) => match item.as_object()?.get(field)? {
            nested @ Value::Object(_) => nested.identity(id_field),
            scalar => scalar.scalar_text(),
        },
    }
}

fn substitute_fields(path: &FieldPath, value: Value, names: &[String]) -> Result<Value> {
    let Value::Object(mut map) = value else {
        return Err(Error::TypeMismatch {
            path: path.to_string(),
            expected: "object",
            found: value.type_name(),
        });
    };
    for name in names {
        let field = map.get(name).ok_or_else(|| Error::missing_field(name.clone()))?;
        let id = DocumentId::from_value(field)?;
        map.insert(name.clone(), Value::Id(id));
    }
    Ok(Value::Object(map))
}

fn localize(value: Value, locale: &str) -> Value {
    match value.scalar_text() {
        Some(text) => Value::Object(Map::from([(locale.to_string(), Value::String(text))])),
        None => value,
    }
}
