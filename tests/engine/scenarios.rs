//! Mutation scenarios run through the gateway against a memory store

use std::sync::Arc;

use serde_json::json;

use docmend_core::{ErrorKind, Timestamp, Value};
use docmend_engine::{
    Change, EngineConfig, Gateway, ManualClock, Mutation, Mutator, Substitution, Target,
};

use crate::common::{filter, seeded, stored};

fn gateway_at(secs: u64) -> Gateway {
    let clock = Arc::new(ManualClock::new(Timestamp::from_secs(secs)));
    Gateway::new(Mutator::new(&EngineConfig::default()).with_clock(clock))
}

#[test]
fn append_extends_existing_array() {
    let forms = seeded("forms", vec![json!({"name": "f", "tags": ["a", "b"]})]);
    let applied = Gateway::default()
        .execute(
            &forms,
            Some(&filter(json!({"name": "f"}))),
            Target::One,
            &Mutation::Changes(vec![Change::append("tags".parse().unwrap(), "c")]),
            true,
        )
        .unwrap();

    assert_eq!(
        applied.outcomes[0].dirty.iter().collect::<Vec<_>>(),
        vec!["tags"]
    );
    assert_eq!(stored(&forms, json!({"name": "f"}))["tags"], json!(["a", "b", "c"]));
}

#[test]
fn set_status_on_empty_document() {
    let forms = seeded("forms", vec![json!({})]);
    let applied = gateway_at(1_700_000_000)
        .execute(
            &forms,
            Some(&filter(json!({}))),
            Target::One,
            &Mutation::Changes(vec![Change::set_status("status".parse().unwrap(), "done")]),
            false,
        )
        .unwrap();

    let status = applied.documents[0].get("status").unwrap().as_object().unwrap();
    assert_eq!(status.get("code"), Some(&Value::from("done")));
    assert_eq!(
        status.get("date"),
        Some(&Value::Timestamp(Timestamp::from_secs(1_700_000_000)))
    );
}

#[test]
fn dedupe_by_key_keeps_first_of_each() {
    let forms = seeded(
        "forms",
        vec![json!({"rows": [
            {"id": 1, "k": "x"},
            {"id": 2, "k": "x"},
            {"id": 3, "k": "y"}
        ]})],
    );
    let applied = Gateway::default()
        .execute(
            &forms,
            Some(&filter(json!({}))),
            Target::One,
            &Mutation::Dedupe {
                path: "rows".parse().unwrap(),
                key: Some("k".into()),
            },
            true,
        )
        .unwrap();

    let rows = stored(&forms, json!({}))["rows"].clone();
    assert_eq!(rows, json!([{"id": 1, "k": "x"}, {"id": 3, "k": "y"}]));
    match &applied.outcomes[0].effect {
        docmend_engine::Effect::Deduplicated(report) => {
            assert_eq!(report.duplicates.len(), 1);
            assert_eq!(report.original_count, 3);
        }
        other => panic!("Expected Deduplicated, got {:?}", other),
    }
}

#[test]
fn append_to_scalar_leaves_store_untouched() {
    let forms = seeded("forms", vec![json!({"tags": 5})]);
    let err = Gateway::default()
        .execute(
            &forms,
            Some(&filter(json!({}))),
            Target::One,
            &Mutation::Changes(vec![Change::append("tags".parse().unwrap(), "x")]),
            true,
        )
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert_eq!(forms.save_count(), 0);
    assert_eq!(stored(&forms, json!({}))["tags"], json!(5));
}

#[test]
fn failure_in_any_document_aborts_many() {
    let forms = seeded(
        "forms",
        vec![
            json!({"kind": "a", "tags": []}),
            json!({"kind": "a", "tags": "oops"}),
        ],
    );
    let err = Gateway::default()
        .execute(
            &forms,
            Some(&filter(json!({"kind": "a"}))),
            Target::Many,
            &Mutation::Changes(vec![Change::append("tags".parse().unwrap(), "x")]),
            true,
        )
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert_eq!(forms.save_count(), 0);
}

#[test]
fn nested_set_through_identifier_selectors() {
    let forms = seeded(
        "forms",
        vec![json!({"sections": [
            {"_id": "s1", "fields": [{"_id": "f1", "label": "old"}]},
            {"_id": "s2", "fields": []}
        ]})],
    );
    Gateway::default()
        .execute(
            &forms,
            Some(&filter(json!({}))),
            Target::One,
            &Mutation::Changes(vec![Change::set(
                "sections.s1.fields.f1.label".parse().unwrap(),
                "new",
            )]),
            true,
        )
        .unwrap();

    let doc = stored(&forms, json!({}));
    assert_eq!(doc["sections"][0]["fields"][0]["label"], json!("new"));
}

#[test]
fn append_with_id_fields_converts_before_push() {
    let forms = seeded("forms", vec![json!({"refs": []})]);
    let id = docmend_core::DocumentId::new();
    let applied = Gateway::default()
        .execute(
            &forms,
            Some(&filter(json!({}))),
            Target::One,
            &Mutation::AppendWithIds {
                path: "refs".parse().unwrap(),
                value: Value::from(docmend_core::Map::from([
                    ("user".to_string(), Value::from(id.to_hex())),
                    ("role".to_string(), Value::from("owner")),
                ])),
                substitution: Some(Substitution::Fields(vec!["user".into()])),
            },
            true,
        )
        .unwrap();

    let refs = applied.documents[0].get("refs").unwrap().as_array().unwrap();
    let pushed = refs[0].as_object().unwrap();
    assert_eq!(pushed.get("user"), Some(&Value::Id(id)));
}

#[test]
fn set_on_identifier_field_is_refused() {
    let forms = seeded("forms", vec![json!({"name": "f"})]);
    let err = Gateway::default()
        .execute(
            &forms,
            Some(&filter(json!({}))),
            Target::One,
            &Mutation::Changes(vec![Change::set("_id".parse().unwrap(), "x")]),
            true,
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidOperation);
}
