//! Error handling: every failure surfaces with its kind and context

use std::sync::Arc;

use serde_json::json;

use docmend::{Collection, Command, Context, Error, ErrorKind, MemoryCollection};
use docmend_core::{Document, StoreError, StoreResult};
use docmend_engine::Filter;

use crate::common::{create_executor, seeded};

/// Store whose saves always fail
struct RejectingCollection(Arc<MemoryCollection>);

impl Collection for RejectingCollection {
    fn name(&self) -> &str {
        self.0.name()
    }
    fn find(&self, filter: &Filter) -> StoreResult<Vec<Document>> {
        self.0.find(filter)
    }
    fn find_one(&self, filter: &Filter) -> StoreResult<Option<Document>> {
        self.0.find_one(filter)
    }
    fn save(&self, _document: Document) -> StoreResult<Document> {
        Err(StoreError::timeout("save deadline exceeded"))
    }
    fn create(&self, _documents: Vec<Document>) -> StoreResult<Vec<Document>> {
        Err(StoreError::backend("read-only replica"))
    }
    fn delete(&self, filter: &Filter) -> StoreResult<usize> {
        self.0.delete(filter)
    }
    fn count(&self) -> StoreResult<usize> {
        self.0.count()
    }
}

fn update(changes: serde_json::Value) -> Command {
    Command::Update {
        collection: "forms".into(),
        query: Some(json!({})),
        changes,
        many: false,
        save: true,
    }
}

fn kind_of(cmd: Command, docs: Vec<serde_json::Value>) -> ErrorKind {
    let executor = create_executor();
    executor.catalog().register(seeded("forms", docs));
    executor
        .execute(&Context::new("ops"), cmd)
        .unwrap_err()
        .kind()
}

#[test]
fn missing_query() {
    let cmd = Command::Update {
        collection: "forms".into(),
        query: None,
        changes: json!({"path": "a", "set": 1}),
        many: false,
        save: true,
    };
    assert_eq!(kind_of(cmd, vec![json!({})]), ErrorKind::MissingQuery);
}

#[test]
fn unknown_collection() {
    let cmd = Command::Find {
        collection: "nope".into(),
        query: Some(json!({})),
    };
    assert_eq!(kind_of(cmd, vec![]), ErrorKind::NotFound);
}

#[test]
fn no_matching_document() {
    let cmd = Command::Update {
        collection: "forms".into(),
        query: Some(json!({"name": "ghost"})),
        changes: json!({"path": "a", "set": 1}),
        many: false,
        save: true,
    };
    assert_eq!(kind_of(cmd, vec![json!({"name": "f"})]), ErrorKind::NotFound);
}

#[test]
fn malformed_changes() {
    let docs = || vec![json!({})];
    assert_eq!(
        kind_of(update(json!({"path": "a", "merge": 1})), docs()),
        ErrorKind::InvalidOperation
    );
    assert_eq!(
        kind_of(update(json!({"path": "a", "set": 1, "append": 2})), docs()),
        ErrorKind::InvalidOperation
    );
    assert_eq!(
        kind_of(update(json!({"set": 1})), docs()),
        ErrorKind::MissingField
    );
    assert_eq!(
        kind_of(update(json!({"path": "a..b", "set": 1})), docs()),
        ErrorKind::InvalidOperation
    );
}

#[test]
fn invalid_identifier() {
    assert_eq!(
        kind_of(update(json!({"path": "owner", "setId": 42})), vec![json!({})]),
        ErrorKind::InvalidIdentifier
    );
}

#[test]
fn duplicate_on_absent_field() {
    let cmd = Command::Duplicate {
        collection: "forms".into(),
        query: Some(json!({})),
        path: "rows".into(),
        save: true,
    };
    let executor = create_executor();
    executor.catalog().register(seeded("forms", vec![json!({})]));
    let err = executor.execute(&Context::new("ops"), cmd).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotAnArray);
    assert_eq!(err.report().context, Some(json!({"path": "rows", "found": "absent"})));
}

#[test]
fn persistence_failure_carries_preview() {
    let inner = seeded("forms", vec![json!({"tags": ["a"]})]);
    let executor = create_executor();
    executor
        .catalog()
        .register(Arc::new(RejectingCollection(inner.clone())));

    let err = executor
        .execute(&Context::new("ops"), update(json!({"path": "tags", "append": "b"})))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::PersistenceFailure);
    match &err {
        Error::PersistenceFailure {
            collection,
            reason,
            preview,
        } => {
            assert_eq!(collection, "forms");
            assert!(reason.contains("timeout"));
            assert_eq!(preview[0]["tags"], json!(["a", "b"]));
        }
        other => panic!("Expected PersistenceFailure, got {:?}", other),
    }

    let report = serde_json::to_value(err.report()).unwrap();
    assert_eq!(report["kind"], json!("PersistenceFailure"));
    assert_eq!(report["context"]["preview"][0]["tags"], json!(["a", "b"]));
    assert_eq!(inner.snapshot()[0].to_json()["tags"], json!(["a"]));
}

#[test]
fn failed_create_reports_unsaved_documents() {
    let executor = create_executor();
    executor
        .catalog()
        .register(Arc::new(RejectingCollection(seeded("forms", vec![]))));

    let err = executor
        .execute(
            &Context::new("ops"),
            Command::Create {
                collection: "forms".into(),
                documents: vec![json!({"n": 1})],
                save: true,
            },
        )
        .unwrap_err();
    match err {
        Error::PersistenceFailure { preview, .. } => {
            assert_eq!(preview.len(), 1);
            assert_eq!(preview[0]["n"], json!(1));
        }
        other => panic!("Expected PersistenceFailure, got {:?}", other),
    }
}
