//! Configuration files driving mutator conventions

use std::fs;
use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;

use docmend_core::{ErrorKind, Timestamp};
use docmend_engine::{
    Change, EngineConfig, Gateway, ManualClock, Mutation, Mutator, Target, CONFIG_FILE_NAME,
};

use crate::common::{filter, seeded};

#[test]
fn status_field_names_come_from_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(
        &path,
        "status_code_field = \"state\"\nstatus_date_field = \"at\"\n",
    )
    .unwrap();

    let config = EngineConfig::from_file(&path).unwrap();
    let clock = Arc::new(ManualClock::new(Timestamp::from_secs(10)));
    let gateway = Gateway::new(Mutator::new(&config).with_clock(clock));

    let forms = seeded("forms", vec![json!({})]);
    let applied = gateway
        .execute(
            &forms,
            Some(&filter(json!({}))),
            Target::One,
            &Mutation::Changes(vec![Change::set_status("status".parse().unwrap(), "open")]),
            false,
        )
        .unwrap();

    let status = applied.documents[0].to_json()["status"].clone();
    assert_eq!(status["state"], json!("open"));
    assert!(status["at"].is_string());
    assert!(status.get("code").is_none());
}

#[test]
fn default_file_is_written_once() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);

    EngineConfig::write_default_if_missing(&path).unwrap();
    assert_eq!(EngineConfig::from_file(&path).unwrap(), EngineConfig::default());

    fs::write(&path, "default_locale = \"de\"\n").unwrap();
    EngineConfig::write_default_if_missing(&path).unwrap();
    assert_eq!(EngineConfig::from_file(&path).unwrap().default_locale, "de");
}

#[test]
fn invalid_file_is_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, "id_field = \"\"\n").unwrap();
    let err = EngineConfig::from_file(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
}
