//! Common test utilities for engine tests

use std::collections::HashSet;

use parking_lot::Mutex;

use docmend_core::{Document, DocumentId, StoreError, StoreResult};
use docmend_engine::{Collection, Filter, MemoryCollection};

/// Create a memory collection holding the given JSON documents
pub fn seeded(name: &str, docs: Vec<serde_json::Value>) -> MemoryCollection {
    let c = MemoryCollection::new(name);
    c.create(docs.into_iter().map(doc).collect()).unwrap();
    c
}

/// Build a document from JSON
pub fn doc(json: serde_json::Value) -> Document {
    Document::from_json(json).unwrap()
}

/// Build a filter from JSON
pub fn filter(json: serde_json::Value) -> Filter {
    Filter::from_json(json).unwrap()
}

/// Stored document matching `query`, as JSON
pub fn stored(c: &dyn Collection, query: serde_json::Value) -> serde_json::Value {
    c.find_one(&filter(query)).unwrap().unwrap().to_json()
}

/// Memory collection whose saves fail for chosen documents, and whose reads
/// can be made to time out
pub struct FlakyCollection {
    inner: MemoryCollection,
    failing: Mutex<HashSet<DocumentId>>,
    reads_fail: Mutex<bool>,
    save_attempts: Mutex<usize>,
}

#[allow(dead_code)]
impl FlakyCollection {
    pub fn new(inner: MemoryCollection) -> Self {
        FlakyCollection {
            inner,
            failing: Mutex::new(HashSet::new()),
            reads_fail: Mutex::new(false),
            save_attempts: Mutex::new(0),
        }
    }

    /// Make every save of the documents matching `query` fail
    pub fn fail_saves_of(&self, query: serde_json::Value) {
        let ids = self
            .inner
            .find(&filter(query))
            .unwrap()
            .iter()
            .filter_map(|d| d.id_of(self.inner.id_field()))
            .collect::<Vec<_>>();
        self.failing.lock().extend(ids);
    }

    /// Make `find` and `find_one` time out
    pub fn fail_reads(&self) {
        *self.reads_fail.lock() = true;
    }

    /// Number of saves attempted, failed or not
    pub fn save_attempts(&self) -> usize {
        *self.save_attempts.lock()
    }

    pub fn inner(&self) -> &MemoryCollection {
        &self.inner
    }

    fn check_reads(&self) -> StoreResult<()> {
        if *self.reads_fail.lock() {
            return Err(StoreError::timeout("read deadline exceeded"));
        }
        Ok(())
    }
}

impl Collection for FlakyCollection {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn find(&self, filter: &Filter) -> StoreResult<Vec<Document>> {
        self.check_reads()?;
        self.inner.find(filter)
    }

    fn find_one(&self, filter: &Filter) -> StoreResult<Option<Document>> {
        self.check_reads()?;
        self.inner.find_one(filter)
    }

    fn save(&self, document: Document) -> StoreResult<Document> {
        *self.save_attempts.lock() += 1;
        let id = document.id_of(self.inner.id_field());
        if id.is_some_and(|id| self.failing.lock().contains(&id)) {
            return Err(StoreError::backend("write rejected"));
        }
        self.inner.save(document)
    }

    fn create(&self, documents: Vec<Document>) -> StoreResult<Vec<Document>> {
        self.inner.create(documents)
    }

    fn delete(&self, filter: &Filter) -> StoreResult<usize> {
        self.inner.delete(filter)
    }

    fn count(&self) -> StoreResult<usize> {
        self.inner.count()
    }
}
