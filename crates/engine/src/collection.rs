//! Collection handles
//!
//! The engine reaches the document store only through [`Collection`]. A
//! routing layer that has already authorized the caller hands the engine a
//! handle per collection, usually looked up by name in a [`Catalog`].
//!
//! [`MemoryCollection`] is the in-process reference store. It behaves like
//! stores that track in-place changes by field: saving an existing document
//! writes only the fields marked through [`Collection::mark_changed`], so a
//! change that was never announced is silently dropped.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use docmend_core::resolve;
use docmend_core::{
    Document, DocumentId, Error, FieldPath, Map, Result, StoreError, StoreErrorKind, StoreResult,
    Value, ID_FIELD,
};

// =============================================================================
// Filter
// =============================================================================

/// Caller-supplied document predicate
///
/// The engine passes filters through untouched. Stores are free to interpret
/// them; [`MemoryCollection`] treats every clause as an equality test on a
/// dotted path, with a missing field equal to `null` and an identifier equal
/// to its string rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<(FieldPath, Value)>,
}

impl Filter {
    /// Filter matching every document
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter on a document identifier
    pub fn id(id_field: &str, id: DocumentId) -> Self {
        Self::all().eq(FieldPath::root().key(id_field), Value::Id(id))
    }

    /// Add an equality clause (builder pattern)
    pub fn eq(mut self, path: FieldPath, value: impl Into<Value>) -> Self {
        self.clauses.push((path, value.into()));
        self
    }

    /// Build from a mapping of dotted paths to expected values
    pub fn from_map(map: &Map) -> Result<Self> {
        let clauses = map
            .iter()
            .map(|(path, value)| Ok((FieldPath::parse(path)?, value.clone())))
            .collect::<Result<Vec<_>>>()?;
        Ok(Filter { clauses })
    }

    /// Build from a JSON object
    pub fn from_json(json: serde_json::Value) -> Result<Self> {
        match Value::from(json) {
            Value::Object(map) => Self::from_map(&map),
            other => Err(Error::invalid_operation(format!(
                "query must be an object, found {}",
                other.type_name()
            ))),
        }
    }

    /// Equality clauses in insertion order
    pub fn clauses(&self) -> &[(FieldPath, Value)] {
        &self.clauses
    }

    /// Check whether the filter has no clauses
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Evaluate against a document
    pub fn matches(&self, document: &Document, id_field: &str) -> bool {
        self.clauses.iter().all(|(path, expected)| {
            match resolve::get(document, path, id_field) {
                Ok(Some(actual)) => loosely_equal(actual, expected),
                Ok(None) => expected.is_null(),
                Err(_) => false,
            }
        })
    }
}

fn loosely_equal(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Id(id), Value::String(s)) | (Value::String(s), Value::Id(id)) => {
            s.parse::<DocumentId>().map(|p| p == *id).unwrap_or(false)
        }
        _ => actual == expected,
    }
}

// =============================================================================
// Collection trait
// =============================================================================

/// Handle on one logical collection of the document store
///
/// Every call may fail with a [`StoreError`]; timeouts and cancellation are
/// the adapter's policy and are reported as such. The engine propagates them
/// without retrying.
pub trait Collection: Send + Sync {
    /// Collection name
    fn name(&self) -> &str;

    /// Name of the identifier field
    fn id_field(&self) -> &str {
        ID_FIELD
    }

    /// All documents matching the filter
    fn find(&self, filter: &Filter) -> StoreResult<Vec<Document>>;

    /// First document matching the filter
    fn find_one(&self, filter: &Filter) -> StoreResult<Option<Document>>;

    /// Announce that a top-level field of `document` changed in place
    fn mark_changed(&self, document: &mut Document, field: &str) {
        document.mark_modified(field);
    }

    /// Durably save a document
    fn save(&self, document: Document) -> StoreResult<Document>;

    /// Insert new documents
    fn create(&self, documents: Vec<Document>) -> StoreResult<Vec<Document>>;

    /// Remove all documents matching the filter, returning how many were removed
    fn delete(&self, filter: &Filter) -> StoreResult<usize>;

    /// Number of documents in the collection
    fn count(&self) -> StoreResult<usize>;
}

// =============================================================================
// MemoryCollection
// =============================================================================

/// In-memory collection
///
/// Documents are kept in insertion order. Thread-safe; concurrent
/// read-modify-write cycles are last-writer-wins.
#[derive(Debug)]
pub struct MemoryCollection {
    name: String,
    id_field: String,
    documents: RwLock<Vec<Document>>,
    saves: AtomicUsize,
}

impl MemoryCollection {
    /// Create an empty collection using the default identifier field
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id_field(name, ID_FIELD)
    }

    /// Create an empty collection with a custom identifier field
    pub fn with_id_field(name: impl Into<String>, id_field: impl Into<String>) -> Self {
        MemoryCollection {
            name: name.into(),
            id_field: id_field.into(),
            documents: RwLock::new(Vec::new()),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of `save` calls that reached the store
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Copy of every stored document
    pub fn snapshot(&self) -> Vec<Document> {
        self.documents.read().clone()
    }

    fn position(docs: &[Document], id_field: &str, id: DocumentId) -> Option<usize> {
        docs.iter().position(|d| d.id_of(id_field) == Some(id))
    }
}

impl Collection for MemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    fn id_field(&self) -> &str {
        &self.id_field
    }

    fn find(&self, filter: &Filter) -> StoreResult<Vec<Document>> {
        Ok(self
            .documents
            .read()
            .iter()
            .filter(|d| filter.matches(d, &self.id_field))
            .cloned()
            .collect())
    }

    fn find_one(&self, filter: &Filter) -> StoreResult<Option<Document>> {
        Ok(self
            .documents
            .read()
            .iter()
            .find(|d| filter.matches(d, &self.id_field))
            .cloned())
    }

    fn save(&self, mut document: Document) -> StoreResult<Document> {
        let id = document.id_of(&self.id_field).ok_or_else(|| {
            StoreError::backend(format!(
                "cannot save a document without '{}' in '{}'",
                self.id_field, self.name
            ))
        })?;
        self.saves.fetch_add(1, Ordering::SeqCst);

        let mut docs = self.documents.write();
        match Self::position(&docs, &self.id_field, id) {
            Some(pos) => {
                let stored = &mut docs[pos];
                // Only announced fields are written back
                for field in document.modified_fields() {
                    match document.get(field) {
                        Some(value) => {
                            stored.insert(field, value.clone());
                        }
                        None => {
                            stored.remove(field);
                        }
                    }
                }
                Ok(stored.clone())
            }
            None => {
                document.clear_modified();
                docs.push(document.clone());
                Ok(document)
            }
        }
    }

    fn create(&self, documents: Vec<Document>) -> StoreResult<Vec<Document>> {
        let mut docs = self.documents.write();
        let mut prepared = Vec::with_capacity(documents.len());

        for mut document in documents {
            let id = match document.get(&self.id_field) {
                None => {
                    let id = DocumentId::new();
                    document.insert(self.id_field.clone(), Value::Id(id));
                    id
                }
                Some(Value::Id(id)) => *id,
                Some(other) => {
                    return Err(StoreError::backend(format!(
                        "'{}' must be an identifier, found {}",
                        self.id_field,
                        other.type_name()
                    )));
                }
            };
            let taken = Self::position(&docs, &self.id_field, id).is_some()
                || prepared
                    .iter()
                    .any(|d: &Document| d.id_of(&self.id_field) == Some(id));
            if taken {
                return Err(StoreError::new(
                    StoreErrorKind::Conflict,
                    format!("duplicate identifier {} in '{}'", id, self.name),
                ));
            }
            document.clear_modified();
            prepared.push(document);
        }

        docs.extend(prepared.iter().cloned());
        Ok(prepared)
    }

    fn delete(&self, filter: &Filter) -> StoreResult<usize> {
        let mut docs = self.documents.write();
        let before = docs.len();
        docs.retain(|d| !filter.matches(d, &self.id_field));
        Ok(before - docs.len())
    }

    fn count(&self) -> StoreResult<usize> {
        Ok(self.documents.read().len())
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Named collection handles
#[derive(Default)]
pub struct Catalog {
    collections: RwLock<BTreeMap<String, Arc<dyn Collection>>>,
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("collections", &self.names())
            .finish()
    }
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collection under its own name, replacing any previous one
    pub fn register(&self, collection: Arc<dyn Collection>) {
        let name = collection.name().to_string();
        self.collections.write().insert(name, collection);
    }

    /// Look up a collection by name
    pub fn get(&self, name: &str) -> Result<Arc<dyn Collection>> {
        self.collections
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("collection '{}'", name)))
    }

    /// Registered names in order
    pub fn names(&self) -> Vec<String> {
        self.collections.read().keys().cloned().collect()
    }

    /// Number of registered collections
    pub fn len(&self) -> usize {
        self.collections.read().len()
    }

    /// Check whether no collection is registered
    pub fn is_empty(&self) -> bool {
        self.collections.read().is_empty()
    }
}
