//! Common test utilities for executor tests

use std::sync::Arc;

use docmend::{Catalog, Collection, EngineConfig, Executor, MemoryCollection, Output};
use docmend_core::Document;

/// Create an executor over an empty catalog; register collections through
/// `executor.catalog()`
pub fn create_executor() -> Executor {
    Executor::new(Arc::new(Catalog::new()), &EngineConfig::default())
}

/// Create a memory collection holding the given JSON documents
pub fn seeded(name: &str, docs: Vec<serde_json::Value>) -> Arc<MemoryCollection> {
    let c = MemoryCollection::new(name);
    c.create(
        docs.into_iter()
            .map(|v| Document::from_json(v).unwrap())
            .collect(),
    )
    .unwrap();
    Arc::new(c)
}

/// Extract documents from Output::Mutated
#[allow(dead_code)]
pub fn mutated_documents(output: &Output) -> &[serde_json::Value] {
    match output {
        Output::Mutated(m) => &m.documents,
        _ => panic!("Expected Output::Mutated, got {:?}", output),
    }
}

/// Extract documents from Output::Documents
#[allow(dead_code)]
pub fn documents(output: &Output) -> &[serde_json::Value] {
    match output {
        Output::Documents(d) => d,
        _ => panic!("Expected Output::Documents, got {:?}", output),
    }
}
