//! Store failures while reading and persisting

use serde_json::json;

use docmend_core::{Error, ErrorKind, StoreErrorKind};
use docmend_engine::{Change, Gateway, Mutation, Target};

use crate::common::{filter, seeded, stored, FlakyCollection};

fn tag(value: &str) -> Mutation {
    Mutation::Changes(vec![Change::append("tags".parse().unwrap(), value)])
}

#[test]
fn failed_save_still_attempts_remaining_documents() {
    let forms = FlakyCollection::new(seeded(
        "forms",
        vec![
            json!({"n": 1, "tags": []}),
            json!({"n": 2, "tags": []}),
            json!({"n": 3, "tags": []}),
        ],
    ));
    forms.fail_saves_of(json!({"n": 2}));

    let err = Gateway::default()
        .execute(&forms, Some(&filter(json!({}))), Target::Many, &tag("x"), true)
        .unwrap_err();

    assert_eq!(forms.save_attempts(), 3);
    assert_eq!(stored(forms.inner(), json!({"n": 1}))["tags"], json!(["x"]));
    assert_eq!(stored(forms.inner(), json!({"n": 2}))["tags"], json!([]));
    assert_eq!(stored(forms.inner(), json!({"n": 3}))["tags"], json!(["x"]));

    match err {
        Error::PersistenceFailure {
            collection,
            source,
            preview,
        } => {
            assert_eq!(collection, "forms");
            assert_eq!(source.kind, StoreErrorKind::Backend);
            assert_eq!(preview.len(), 3);
            assert!(preview
                .iter()
                .all(|d| d.to_json()["tags"] == json!(["x"])));
        }
        other => panic!("Expected PersistenceFailure, got {:?}", other),
    }
}

#[test]
fn read_timeout_is_store_error() {
    let forms = FlakyCollection::new(seeded("forms", vec![json!({"tags": []})]));
    forms.fail_reads();

    let err = Gateway::default()
        .execute(&forms, Some(&filter(json!({}))), Target::One, &tag("x"), true)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Store);
    match err {
        Error::Store { source, .. } => assert_eq!(source.kind, StoreErrorKind::Timeout),
        other => panic!("Expected Store, got {:?}", other),
    }
    assert_eq!(forms.save_attempts(), 0);
}

#[test]
fn dry_run_never_reaches_a_failing_store() {
    let forms = FlakyCollection::new(seeded("forms", vec![json!({"n": 1, "tags": []})]));
    forms.fail_saves_of(json!({"n": 1}));

    let applied = Gateway::default()
        .execute(&forms, Some(&filter(json!({}))), Target::One, &tag("x"), false)
        .unwrap();

    assert!(!applied.persisted);
    assert_eq!(forms.save_attempts(), 0);
    assert_eq!(applied.documents[0].to_json()["tags"], json!(["x"]));
}
