//! Path resolution over arbitrary documents
//!
//! [`resolve_mut`] walks a [`FieldPath`] through any [`Structural`] root and
//! returns the slot the final segment names, so callers can read and write
//! without resolving twice. Traversal rules per segment:
//!
//! | Node | Key segment | Index segment |
//! |------|-------------|---------------|
//! | mapping | child field (missing → `Absent`) | `TypeMismatch` |
//! | sequence | element whose identifier equals the key (none → `NotFound`) | element at position (out of range → `NotFound`) |
//! | scalar | `TypeMismatch` | `TypeMismatch` |
//!
//! Absence of an intermediate field is not an error: the caller decides
//! whether it is acceptable (append materializes, set creates one level).

use crate::document::{Container, ContainerMut, Structural};
use crate::error::{Error, Result};
use crate::path::{FieldPath, PathSegment};
use crate::value::{Map, Value};

/// Location named by the final segment of a resolved path
#[derive(Debug)]
pub enum Slot<'a> {
    /// A field of a mapping; the field itself may not exist yet
    Field {
        /// Mapping holding the field
        container: &'a mut Map,
        /// Field name
        key: String,
    },
    /// An existing element of a sequence
    Element {
        /// Sequence holding the element
        array: &'a mut Vec<Value>,
        /// Position of the element
        index: usize,
    },
}

impl<'a> Slot<'a> {
    /// Current value in the slot, if any
    pub fn get(&self) -> Option<&Value> {
        match self {
            Slot::Field { container, key } => container.get(key),
            Slot::Element { array, index } => array.get(*index),
        }
    }

    /// Consume the slot into a mutable reference to its value, if any
    pub fn into_mut(self) -> Option<&'a mut Value> {
        match self {
            Slot::Field { container, key } => container.get_mut(&key),
            Slot::Element { array, index } => array.get_mut(index),
        }
    }

    /// Replace the slot's value, returning the previous one
    pub fn write(self, value: Value) -> Option<Value> {
        match self {
            Slot::Field { container, key } => container.insert(key, value),
            Slot::Element { array, index } => Some(std::mem::replace(&mut array[index], value)),
        }
    }
}

/// Outcome of resolving a path
#[derive(Debug)]
pub enum Resolution<'a> {
    /// Every intermediate segment exists
    Found(Slot<'a>),
    /// The segment at `missing_from` names a field that does not exist
    Absent {
        /// Index of the first missing segment
        missing_from: usize,
    },
}

/// Position of the element whose identifier equals `selector`
pub fn select(items: &[Value], selector: &str, id_field: &str) -> Option<usize> {
    items
        .iter()
        .position(|item| item.identity(id_field).as_deref() == Some(selector))
}

fn element_not_found(path: &FieldPath, depth: usize, segment: &PathSegment) -> Error {
    let within = path.prefix(depth);
    match segment {
        PathSegment::Key(selector) => {
            Error::not_found(format!("element '{}' in '{}'", selector, within))
        }
        PathSegment::Index(idx) => {
            Error::not_found(format!("element [{}] in '{}'", idx, within))
        }
    }
}

fn mismatch(path: &FieldPath, depth: usize, expected: &'static str, found: &'static str) -> Error {
    Error::TypeMismatch {
        path: path.prefix(depth).to_string(),
        expected,
        found,
    }
}

/// Resolve `path` for writing
///
/// Returns the slot of the final segment, or `Absent` when an intermediate
/// field is missing. The root path is rejected with `MissingField`.
pub fn resolve_mut<'a, S>(root: &'a mut S, path: &FieldPath, id_field: &str) -> Result<Resolution<'a>>
where
    S: Structural + ?Sized,
{
    let Some((last, parents)) = path.segments().split_last() else {
        return Err(Error::missing_field("path"));
    };

    let mut cursor = root.container_mut();

    for (depth, segment) in parents.iter().enumerate() {
        let next: &'a mut Value = match (cursor, segment) {
            (ContainerMut::Mapping(map), PathSegment::Key(key)) => match map.get_mut(key) {
                Some(child) => child,
                None => return Ok(Resolution::Absent { missing_from: depth }),
            },
            (ContainerMut::Sequence(items), PathSegment::Key(selector)) => {
                let pos = select(items, selector, id_field)
                    .ok_or_else(|| element_not_found(path, depth, segment))?;
                &mut items[pos]
            }
            (ContainerMut::Sequence(items), PathSegment::Index(idx)) => {
                if *idx >= items.len() {
                    return Err(element_not_found(path, depth, segment));
                }
                &mut items[*idx]
            }
            (ContainerMut::Mapping(_), PathSegment::Index(_)) => {
                return Err(mismatch(path, depth, "array", "object"));
            }
            (ContainerMut::Scalar(found), _) => {
                return Err(mismatch(path, depth, "object or array", found));
            }
        };
        cursor = next.container_mut();
    }

    let depth = parents.len();
    match (cursor, last) {
        (ContainerMut::Mapping(container), PathSegment::Key(key)) => Ok(Resolution::Found(Slot::Field {
            container,
            key: key.clone(),
        })),
        (ContainerMut::Sequence(array), PathSegment::Key(selector)) => {
            let index = select(array, selector, id_field)
                .ok_or_else(|| element_not_found(path, depth, last))?;
            Ok(Resolution::Found(Slot::Element { array, index }))
        }
        (ContainerMut::Sequence(array), PathSegment::Index(idx)) => {
            if *idx >= array.len() {
                return Err(element_not_found(path, depth, last));
            }
            Ok(Resolution::Found(Slot::Element { array, index: *idx }))
        }
        (ContainerMut::Mapping(_), PathSegment::Index(_)) => Err(mismatch(path, depth, "array", "object")),
        (ContainerMut::Scalar(found), _) => Err(mismatch(path, depth, "object or array", found)),
    }
}

/// Read the value at `path`
///
/// Missing fields yield `Ok(None)`; selector misses and type mismatches
/// are errors, as in [`resolve_mut`].
pub fn get<'a, S>(root: &'a S, path: &FieldPath, id_field: &str) -> Result<Option<&'a Value>>
where
    S: Structural + ?Sized,
{
    if path.is_root() {
        return Err(Error::missing_field("path"));
    }

    let mut cursor = root.container();
    let mut found: Option<&'a Value> = None;

    for (depth, segment) in path.segments().iter().enumerate() {
        let next: &'a Value = match (cursor, segment) {
            (Container::Mapping(map), PathSegment::Key(key)) => match map.get(key) {
                Some(child) => child,
                None => return Ok(None),
            },
            (Container::Sequence(items), PathSegment::Key(selector)) => {
                let pos = select(items, selector, id_field)
                    .ok_or_else(|| element_not_found(path, depth, segment))?;
                &items[pos]
            }
            (Container::Sequence(items), PathSegment::Index(idx)) => items
                .get(*idx)
                .ok_or_else(|| element_not_found(path, depth, segment))?,
            (Container::Mapping(_), PathSegment::Index(_)) => {
                return Err(mismatch(path, depth, "array", "object"));
            }
            (Container::Scalar(found), _) => {
                return Err(mismatch(path, depth, "object or array", found));
            }
        };
        found = Some(next);
        cursor = next.container();
    }

    Ok(found)
}
