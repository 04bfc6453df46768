//! Dirty tracking: only announced fields reach the store

use serde_json::json;

use docmend_core::Value;
use docmend_engine::dirty::{self, DirtySet};
use docmend_engine::{Collection, Gateway, Mutation, Target};

use crate::common::{filter, seeded, stored};

#[test]
fn save_without_notification_drops_change() {
    let users = seeded("users", vec![json!({"name": "a", "age": 1})]);
    let mut doc = users.find_one(&filter(json!({"name": "a"}))).unwrap().unwrap();
    doc.insert("age", Value::Int(2));

    users.save(doc).unwrap();
    assert_eq!(stored(&users, json!({"name": "a"}))["age"], json!(1));
}

#[test]
fn persist_writes_only_dirty_fields() {
    let users = seeded("users", vec![json!({"name": "a", "age": 1, "city": "x"})]);
    let mut doc = users.find_one(&filter(json!({"name": "a"}))).unwrap().unwrap();
    doc.insert("age", Value::Int(2));
    doc.insert("city", Value::from("y"));

    let dirty: DirtySet = ["age"].into_iter().collect();
    dirty::persist(&users, doc, &dirty).unwrap();

    let after = stored(&users, json!({"name": "a"}));
    assert_eq!(after["age"], json!(2));
    assert_eq!(after["city"], json!("x"));
}

#[test]
fn nested_edit_marks_top_level_field() {
    let users = seeded("users", vec![json!({"profile": {"address": {"city": "x"}}})]);
    let applied = Gateway::default()
        .execute(
            &users,
            Some(&filter(json!({}))),
            Target::One,
            &Mutation::Changes(vec![docmend_engine::Change::set(
                "profile.address.city".parse().unwrap(),
                "y",
            )]),
            true,
        )
        .unwrap();

    assert!(applied.outcomes[0].dirty.contains("profile"));
    assert_eq!(
        stored(&users, json!({}))["profile"]["address"]["city"],
        json!("y")
    );
}

#[test]
fn empty_change_list_saves_nothing() {
    let users = seeded("users", vec![json!({"name": "a"})]);
    let applied = Gateway::default()
        .execute(
            &users,
            Some(&filter(json!({}))),
            Target::One,
            &Mutation::Changes(vec![]),
            true,
        )
        .unwrap();

    assert!(applied.outcomes[0].dirty.is_empty());
    assert_eq!(users.save_count(), 0);
}
