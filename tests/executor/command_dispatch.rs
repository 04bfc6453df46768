//! Command dispatch: every command reaches its operation and renders its
//! result

use serde_json::json;

use docmend::{Collection, Command, Context, Output};
use docmend_core::DocumentId;

use crate::common::{create_executor, documents, mutated_documents, seeded};

fn ctx() -> Context {
    Context::new("ops")
}

#[test]
fn find_returns_matches_as_json() {
    let executor = create_executor();
    executor.catalog().register(seeded(
        "forms",
        vec![json!({"kind": "a"}), json!({"kind": "a"}), json!({"kind": "b"})],
    ));

    let out = executor
        .execute(
            &ctx(),
            Command::Find {
                collection: "forms".into(),
                query: Some(json!({"kind": "a"})),
            },
        )
        .unwrap();
    let docs = documents(&out);
    assert_eq!(docs.len(), 2);
    assert!(docs.iter().all(|d| d["_id"].is_string()));
}

#[test]
fn read_whole_document_and_absent_path() {
    let executor = create_executor();
    executor
        .catalog()
        .register(seeded("forms", vec![json!({"name": "f", "meta": {"v": 1}})]));

    let whole = executor
        .execute(
            &ctx(),
            Command::Read {
                collection: "forms".into(),
                query: Some(json!({"name": "f"})),
                path: String::new(),
            },
        )
        .unwrap();
    match whole {
        Output::Value(v) => assert_eq!(v["meta"], json!({"v": 1})),
        other => panic!("Expected Value, got {:?}", other),
    }

    let absent = executor
        .execute(
            &ctx(),
            Command::Read {
                collection: "forms".into(),
                query: Some(json!({"name": "f"})),
                path: "meta.missing".into(),
            },
        )
        .unwrap();
    assert_eq!(absent, Output::Value(json!(null)));
}

#[test]
fn update_many_mutates_every_match() {
    let executor = create_executor();
    let forms = seeded("forms", vec![json!({"kind": "a"}), json!({"kind": "a"})]);
    executor.catalog().register(forms.clone());

    let out = executor
        .execute(
            &ctx(),
            Command::Update {
                collection: "forms".into(),
                query: Some(json!({"kind": "a"})),
                changes: json!([
                    {"path": "flags.reviewed", "set": true},
                    {"path": "tags", "append": "r"}
                ]),
                many: true,
                save: true,
            },
        )
        .unwrap();

    assert_eq!(mutated_documents(&out).len(), 2);
    assert_eq!(forms.save_count(), 2);
    for doc in forms.snapshot() {
        let doc = doc.to_json();
        assert_eq!(doc["flags"]["reviewed"], json!(true));
        assert_eq!(doc["tags"], json!(["r"]));
    }
}

#[test]
fn set_id_converts_string() {
    let executor = create_executor();
    let forms = seeded("forms", vec![json!({"name": "f"})]);
    executor.catalog().register(forms.clone());
    let owner = DocumentId::new();

    executor
        .execute(
            &ctx(),
            Command::Update {
                collection: "forms".into(),
                query: Some(json!({"name": "f"})),
                changes: json!({"path": "owner", "setId": owner.to_hex()}),
                many: false,
                save: true,
            },
        )
        .unwrap();

    let stored = &forms.snapshot()[0];
    assert_eq!(stored.id_of("owner"), Some(owner));
}

#[test]
fn create_converts_string_ids_and_delete_removes() {
    let executor = create_executor();
    let forms = seeded("forms", vec![]);
    executor.catalog().register(forms.clone());
    let id = DocumentId::new();

    let out = executor
        .execute(
            &ctx(),
            Command::Create {
                collection: "forms".into(),
                documents: vec![json!({"_id": id.to_hex(), "n": 1}), json!({"n": 2})],
                save: true,
            },
        )
        .unwrap();
    match &out {
        Output::Created {
            documents,
            persisted,
        } => {
            assert!(persisted);
            assert_eq!(documents[0]["_id"], json!(id.to_hex()));
            assert!(documents[1]["_id"].is_string());
        }
        other => panic!("Expected Created, got {:?}", other),
    }
    assert_eq!(forms.count().unwrap(), 2);

    let out = executor
        .execute(
            &ctx(),
            Command::Delete {
                collection: "forms".into(),
                query: Some(json!({"_id": id.to_hex()})),
                save: true,
            },
        )
        .unwrap();
    assert!(out.persisted());
    assert_eq!(forms.count().unwrap(), 1);
}

#[test]
fn append_with_ids_value_substitution() {
    let executor = create_executor();
    let forms = seeded("forms", vec![json!({"members": []})]);
    executor.catalog().register(forms.clone());
    let member = DocumentId::new();

    executor
        .execute(
            &ctx(),
            Command::AppendWithIds {
                collection: "forms".into(),
                query: Some(json!({})),
                path: "members".into(),
                value: json!(member.to_hex()),
                substitute: Some(docmend::types::IdSubstitution::Value),
                save: true,
            },
        )
        .unwrap();

    let stored = &forms.snapshot()[0];
    let members = stored.get("members").unwrap().as_array().unwrap();
    assert_eq!(members[0].as_id(), Some(member));
}

#[test]
fn inject_uses_configured_default_locale() {
    let executor = create_executor();
    let forms = seeded(
        "forms",
        vec![json!({"fields": [{"_id": "f1", "enum_opts": [{"en": "No"}]}]})],
    );
    executor.catalog().register(forms.clone());

    let out = executor
        .execute(
            &ctx(),
            Command::Inject {
                collection: "forms".into(),
                query: Some(json!({})),
                path: "fields.f1.enum_opts".into(),
                values: vec![json!("Yes")],
                locale: None,
                save: false,
            },
        )
        .unwrap();
    assert_eq!(
        mutated_documents(&out)[0]["fields"][0]["enum_opts"],
        json!([{"en": "No"}, {"en": "Yes"}])
    );
    assert_eq!(forms.save_count(), 0);
}

#[test]
fn collections_and_stats() {
    let executor = create_executor();
    executor
        .catalog()
        .register(seeded("forms", vec![json!({}), json!({})]));
    executor.catalog().register(seeded("users", vec![json!({})]));

    assert_eq!(
        executor.execute(&ctx(), Command::Collections).unwrap(),
        Output::Collections(vec!["forms".into(), "users".into()])
    );
    match executor.execute(&ctx(), Command::Stats).unwrap() {
        Output::Stats(s) => {
            assert_eq!(s.counts["forms"], 2);
            assert_eq!(s.counts["users"], 1);
            assert!(!s.computed_at.is_empty());
        }
        other => panic!("Expected Stats, got {:?}", other),
    }
}

#[test]
fn commands_accepted_as_json() {
    let executor = create_executor();
    let forms = seeded("forms", vec![json!({"name": "f", "rows": [1, 2]})]);
    executor.catalog().register(forms.clone());

    let cmd: Command = serde_json::from_value(json!({
        "Duplicate": {
            "collection": "forms",
            "query": {"name": "f"},
            "path": "rows",
            "save": true
        }
    }))
    .unwrap();
    executor.execute(&ctx(), cmd).unwrap();
    assert_eq!(forms.snapshot()[0].to_json()["rows"], json!([1, 2, 1, 2]));
}
