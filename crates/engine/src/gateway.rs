//! Generic query gateway
//!
//! Entry point of a mutation request: fetch the target document(s) with the
//! caller's filter, apply a [`Mutation`] to each in memory, then either
//! return the result as a preview (dry run) or persist every document
//! through [`dirty::persist`].
//!
//! ## Guarantees
//!
//! - A request without a filter fails with `MissingQuery` before the store is
//!   touched.
//! - A failed mutation on any document aborts the request; nothing is saved.
//! - A dry run never calls `save`, `create` or `delete`.
//! - Save failures do not stop the remaining documents from being saved; the
//!   first one is returned as `PersistenceFailure` carrying the in-memory
//!   preview of every document.

use tracing::{debug, info, warn};

use docmend_core::resolve;
use docmend_core::{Document, DocumentId, Error, FieldPath, Result, StoreError, Value};

use crate::apply::{Change, Mutator};
use crate::array::{DedupeReport, Substitution};
use crate::collection::{Collection, Filter};
use crate::dirty::{self, DirtySet};

/// How many documents a request targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Exactly one; zero matches is `NotFound`
    One,
    /// Every match, each independently; zero matches is an empty result
    Many,
}

/// Edit applied to each targeted document
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Ordered change descriptors
    Changes(Vec<Change>),
    /// Push a value with identifier substitution
    AppendWithIds {
        /// Array field
        path: FieldPath,
        /// Value to push
        value: Value,
        /// Which parts of the value become identifiers
        substitution: Option<Substitution>,
    },
    /// Push values at nested depth
    Inject {
        /// Array field, possibly below identifier selectors
        path: FieldPath,
        /// Values to push
        values: Vec<Value>,
        /// Locale for `enum_opts` wrapping
        locale: Option<String>,
    },
    /// Append a deep copy of every element
    Duplicate {
        /// Array field
        path: FieldPath,
    },
    /// Remove elements whose key was already seen
    Dedupe {
        /// Array field
        path: FieldPath,
        /// Sub-field to key on; the element identifier when absent
        key: Option<String>,
    },
    /// Splice out one selected element
    RemoveElement {
        /// Path whose last segment selects the element
        path: FieldPath,
    },
}

/// What a mutation did to one document beyond the dirty fields
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Fields were written
    Changed,
    /// The array was doubled to `length` elements
    Duplicated {
        /// Length after duplication
        length: usize,
    },
    /// Duplicates were removed
    Deduplicated(DedupeReport),
    /// An element was removed
    Removed(Value),
}

/// Per-document mutation result
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Top-level fields touched
    pub dirty: DirtySet,
    /// Operation-specific result
    pub effect: Effect,
}

/// Result of a gateway request
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    /// Mutated documents, as saved when persisted
    pub documents: Vec<Document>,
    /// Per-document outcomes, parallel to `documents`
    pub outcomes: Vec<Outcome>,
    /// Whether the documents were persisted
    pub persisted: bool,
}

/// Mutation request executor over collection handles
#[derive(Debug, Clone, Default)]
pub struct Gateway {
    mutator: Mutator,
}

fn store_error(collection: &dyn Collection, source: StoreError) -> Error {
    Error::Store {
        collection: collection.name().to_string(),
        source,
    }
}

fn require_filter(filter: Option<&Filter>) -> Result<&Filter> {
    filter.ok_or(Error::MissingQuery)
}

fn no_match(collection: &dyn Collection, filter: &Filter) -> Error {
    Error::not_found(format!(
        "no document in '{}' matches {:?}",
        collection.name(),
        filter.clauses()
    ))
}

impl Gateway {
    /// Create a gateway around a mutator
    pub fn new(mutator: Mutator) -> Self {
        Gateway { mutator }
    }

    /// The mutator applied to fetched documents
    pub fn mutator(&self) -> &Mutator {
        &self.mutator
    }

    /// Fetch the targeted documents, mutate them, optionally persist
    pub fn execute(
        &self,
        collection: &dyn Collection,
        filter: Option<&Filter>,
        target: Target,
        mutation: &Mutation,
        persist: bool,
    ) -> Result<Applied> {
        let filter = require_filter(filter)?;
        let mut documents = self.fetch(collection, filter, target)?;

        let mut outcomes = Vec::with_capacity(documents.len());
        for document in documents.iter_mut() {
            outcomes.push(self.mutate(document, mutation)?);
        }

        info!(
            target: "docmend::gateway",
            collection = %collection.name(),
            matched = documents.len(),
            persist,
            "Mutation applied"
        );

        if !persist {
            return Ok(Applied {
                documents,
                outcomes,
                persisted: false,
            });
        }

        let mut saved = Vec::with_capacity(documents.len());
        let mut first_failure = None;
        for (document, outcome) in documents.iter().zip(&outcomes) {
            if outcome.dirty.is_empty() {
                saved.push(document.clone());
                continue;
            }
            match dirty::persist(collection, document.clone(), &outcome.dirty) {
                Ok(stored) => saved.push(stored),
                Err(e) => {
                    warn!(
                        target: "docmend::gateway",
                        collection = %collection.name(),
                        id = ?document.id_of(collection.id_field()),
                        error = %e,
                        "Failed to save mutated document"
                    );
                    saved.push(document.clone());
                    if first_failure.is_none() {
                        first_failure = Some(e);
                    }
                }
            }
        }

        if let Some(source) = first_failure {
            return Err(Error::PersistenceFailure {
                collection: collection.name().to_string(),
                source,
                preview: documents,
            });
        }

        Ok(Applied {
            documents: saved,
            outcomes,
            persisted: true,
        })
    }

    fn fetch(&self, collection: &dyn Collection, filter: &Filter, target: Target) -> Result<Vec<Document>> {
        match target {
            Target::One => collection
                .find_one(filter)
                .map_err(|e| store_error(collection, e))?
                .map(|d| vec![d])
                .ok_or_else(|| no_match(collection, filter)),
            Target::Many => collection
                .find(filter)
                .map_err(|e| store_error(collection, e)),
        }
    }

    fn mutate(&self, document: &mut Document, mutation: &Mutation) -> Result<Outcome> {
        let m = &self.mutator;
        let (dirty, effect) = match mutation {
            Mutation::Changes(changes) => (m.apply(document, changes)?, Effect::Changed),
            Mutation::AppendWithIds {
                path,
                value,
                substitution,
            } => (
                m.append_with_ids(document, path, value.clone(), substitution.as_ref())?,
                Effect::Changed,
            ),
            Mutation::Inject {
                path,
                values,
                locale,
            } => (
                m.inject(document, path, values.clone(), locale.as_deref())?,
                Effect::Changed,
            ),
            Mutation::Duplicate { path } => {
                let (dirty, length) = m.duplicate(document, path)?;
                (dirty, Effect::Duplicated { length })
            }
            Mutation::Dedupe { path, key } => {
                let (dirty, report) = m.dedupe(document, path, key.as_deref())?;
                (dirty, Effect::Deduplicated(report))
            }
            Mutation::RemoveElement { path } => {
                let (dirty, removed) = m.remove_element(document, path)?;
                (dirty, Effect::Removed(removed))
            }
        };
        Ok(Outcome { dirty, effect })
    }

    /// All documents matching the filter
    pub fn find(&self, collection: &dyn Collection, filter: Option<&Filter>) -> Result<Vec<Document>> {
        let filter = require_filter(filter)?;
        collection.find(filter).map_err(|e| store_error(collection, e))
    }

    /// Value at `path` in the one matching document, `Null` when absent
    pub fn read(&self, collection: &dyn Collection, filter: Option<&Filter>, path: &FieldPath) -> Result<Value> {
        let filter = require_filter(filter)?;
        let mut documents = self.fetch(collection, filter, Target::One)?;
        let document = documents.pop().ok_or_else(|| no_match(collection, filter))?;
        if path.is_root() {
            return Ok(document.into_value());
        }
        Ok(resolve::get(&document, path, self.mutator.id_field())?
            .cloned()
            .unwrap_or(Value::Null))
    }

    /// Duplicate report for the array at `path` in the one matching document
    pub fn find_duplicates(
        &self,
        collection: &dyn Collection,
        filter: Option<&Filter>,
        path: &FieldPath,
        key: Option<&str>,
    ) -> Result<DedupeReport> {
        let filter = require_filter(filter)?;
        let documents = self.fetch(collection, filter, Target::One)?;
        let document = documents.first().ok_or_else(|| no_match(collection, filter))?;
        self.mutator.find_duplicates(document, path, key)
    }

    /// Insert documents, assigning identifiers to those without one
    ///
    /// A dry run returns the documents as they would be created.
    pub fn create(&self, collection: &dyn Collection, documents: Vec<Document>, persist: bool) -> Result<Vec<Document>> {
        let id_field = collection.id_field().to_string();
        let prepared: Vec<Document> = documents
            .into_iter()
            .map(|mut d| {
                if !d.contains_key(&id_field) {
                    d.insert(id_field.clone(), Value::Id(DocumentId::new()));
                }
                d
            })
            .collect();

        if !persist {
            debug!(target: "docmend::gateway", collection = %collection.name(), count = prepared.len(), "Dry-run create");
            return Ok(prepared);
        }

        collection
            .create(prepared.clone())
            .map_err(|source| Error::PersistenceFailure {
                collection: collection.name().to_string(),
                source,
                preview: prepared,
            })
    }

    /// Remove every matching document, returning what was removed
    ///
    /// Zero matches is `NotFound`. A dry run returns the matches untouched.
    pub fn delete(&self, collection: &dyn Collection, filter: Option<&Filter>, persist: bool) -> Result<Vec<Document>> {
        let filter = require_filter(filter)?;
        let matches = collection.find(filter).map_err(|e| store_error(collection, e))?;
        if matches.is_empty() {
            return Err(no_match(collection, filter));
        }
        if !persist {
            return Ok(matches);
        }

        let removed = collection
            .delete(filter)
            .map_err(|source| Error::PersistenceFailure {
                collection: collection.name().to_string(),
                source,
                preview: matches.clone(),
            })?;
        info!(target: "docmend::gateway", collection = %collection.name(), removed, "Documents deleted");
        Ok(matches)
    }
}
