//! Dirty tracking
//!
//! Stores persist in-place structural changes only for fields they have been
//! told about. Every mutation in this crate returns the [`DirtySet`] of
//! top-level fields it touched, and [`persist`] is the only save path the
//! engine uses: it requires that set, notifies the collection of each field
//! exactly once, then saves.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use docmend_core::{Document, FieldPath, StoreResult};

use crate::collection::Collection;

/// Top-level fields touched by a mutation sequence
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DirtySet(BTreeSet<String>);

impl DirtySet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a top-level field
    pub fn insert(&mut self, field: impl Into<String>) {
        self.0.insert(field.into());
    }

    /// Record the top-level field a path starts at
    pub fn touch(&mut self, path: &FieldPath) {
        if let Some(field) = path.top_level() {
            self.0.insert(field.to_string());
        }
    }

    /// Merge another set into this one
    pub fn extend(&mut self, other: DirtySet) {
        self.0.extend(other.0);
    }

    /// Check whether a field is recorded
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains(field)
    }

    /// Number of recorded fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether nothing was touched
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Recorded fields in name order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for DirtySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        DirtySet(iter.into_iter().map(Into::into).collect())
    }
}

/// Pass every dirty field to the collection's change hook
pub fn notify(collection: &dyn Collection, document: &mut Document, dirty: &DirtySet) {
    for field in dirty.iter() {
        collection.mark_changed(document, field);
    }
}

/// Notify, then save
pub fn persist(
    collection: &dyn Collection,
    mut document: Document,
    dirty: &DirtySet,
) -> StoreResult<Document> {
    notify(collection, &mut document, dirty);
    collection.save(document)
}
