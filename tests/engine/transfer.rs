//! Cross-collection transfer against failing stores

use serde_json::json;

use docmend_core::ErrorKind;
use docmend_engine::{Collection, Gateway, TransferPlan};

use crate::common::{filter, seeded, stored, FlakyCollection};

#[test]
fn transfer_continues_past_save_failures() {
    let users = seeded(
        "users",
        vec![
            json!({"email": "a@x", "org": "Acme"}),
            json!({"email": "b@x", "org": "Globex"}),
        ],
    );
    let tickets = FlakyCollection::new(seeded(
        "tickets",
        vec![
            json!({"email": "a@x", "n": 1}),
            json!({"email": "a@x", "n": 2}),
            json!({"email": "b@x", "n": 3}),
        ],
    ));
    tickets.fail_saves_of(json!({"n": 1}));

    let all = filter(json!({}));
    let plan = TransferPlan {
        from: &users,
        from_filter: Some(&all),
        link_field: "email".parse().unwrap(),
        from_field: "org".parse().unwrap(),
        to: &tickets,
        to_field: "org".parse().unwrap(),
    };
    let report = Gateway::default().transfer(&plan, true).unwrap();

    assert_eq!(report.linked, 3);
    assert_eq!(report.updated, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(tickets.save_attempts(), 3);

    let with_org = tickets
        .inner()
        .find(&filter(json!({"org": "Acme"})))
        .unwrap();
    assert_eq!(with_org.len(), 1);
    assert_eq!(with_org[0].to_json()["n"], json!(2));
}

#[test]
fn transfer_records_failed_lookup() {
    let users = seeded("users", vec![json!({"email": "a@x", "org": "Acme"})]);
    let tickets = FlakyCollection::new(seeded("tickets", vec![json!({"email": "a@x"})]));
    tickets.fail_reads();

    let all = filter(json!({}));
    let plan = TransferPlan {
        from: &users,
        from_filter: Some(&all),
        link_field: "email".parse().unwrap(),
        from_field: "org".parse().unwrap(),
        to: &tickets,
        to_field: "org".parse().unwrap(),
    };
    let report = Gateway::default().transfer(&plan, true).unwrap();
    assert_eq!(report.updated, 0);
    assert_eq!(report.failures.len(), 1);
}

#[test]
fn transfer_fails_when_sources_unreadable() {
    let users = FlakyCollection::new(seeded("users", vec![json!({"email": "a@x"})]));
    users.fail_reads();
    let tickets = seeded("tickets", vec![]);

    let all = filter(json!({}));
    let plan = TransferPlan {
        from: &users,
        from_filter: Some(&all),
        link_field: "email".parse().unwrap(),
        from_field: "org".parse().unwrap(),
        to: &tickets,
        to_field: "org".parse().unwrap(),
    };
    let err = Gateway::default().transfer(&plan, true).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Store);
}

#[test]
fn transfer_skips_null_links() {
    let users = seeded(
        "users",
        vec![
            json!({"email": null, "org": "Acme"}),
            json!({"email": "z@x", "org": "Globex"}),
        ],
    );
    let tickets = seeded(
        "tickets",
        vec![
            json!({"n": 1}),
            json!({"n": 2}),
            json!({"email": "z@x", "n": 3}),
        ],
    );

    let all = filter(json!({}));
    let plan = TransferPlan {
        from: &users,
        from_filter: Some(&all),
        link_field: "email".parse().unwrap(),
        from_field: "org".parse().unwrap(),
        to: &tickets,
        to_field: "org".parse().unwrap(),
    };
    let report = Gateway::default().transfer(&plan, true).unwrap();

    assert_eq!(report.skipped, 1);
    assert_eq!(report.linked, 1);
    assert_eq!(report.updated, 1);
    assert!(stored(&tickets, json!({"n": 1})).get("org").is_none());
    assert!(stored(&tickets, json!({"n": 2})).get("org").is_none());
    assert_eq!(stored(&tickets, json!({"n": 3}))["org"], json!("Globex"));
}
