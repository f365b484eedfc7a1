mod common;

use std::fs;

use doce_gestao::{
    domain::FinancialDocument,
    storage::{DocumentStore, JsonFileStore, LoadStatus, STORAGE_KEY},
};
use tempfile::tempdir;

#[test]
fn load_without_file_returns_default_document() {
    let temp = tempdir().unwrap();
    let store = JsonFileStore::in_dir(temp.path()).unwrap();
    let outcome = store.load();
    assert_eq!(outcome.status, LoadStatus::Missing);
    assert!(outcome.document.is_empty());
    assert_eq!(outcome.document.config.monthly_goal, 3000.0);
}

#[test]
fn save_then_load_round_trips() {
    let temp = tempdir().unwrap();
    let store = JsonFileStore::in_dir(temp.path()).unwrap();
    let doc = common::march_scenario();

    store.save(&doc).unwrap();
    let first = store.load();
    assert_eq!(first.status, LoadStatus::Loaded);
    assert_eq!(first.document, doc);

    store.save(&first.document).unwrap();
    assert_eq!(store.load().document, doc);
}

#[test]
fn persisted_layout_uses_fixed_field_names() {
    let temp = tempdir().unwrap();
    let store = JsonFileStore::in_dir(temp.path()).unwrap();
    store.save(&common::march_scenario()).unwrap();

    let raw = fs::read_to_string(temp.path().join(format!("{STORAGE_KEY}.json"))).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(value["vendas"].is_array());
    assert!(value["despesas"].is_array());
    assert_eq!(value["config"]["metaLucroMensal"], 3000.0);
    assert_eq!(value["vendas"][0]["valorTotal"], 100.0);
    assert_eq!(value["despesas"][0]["valor"], 40.0);
}

#[test]
fn corrupt_payload_recovers_with_default_and_reports_it() {
    let temp = tempdir().unwrap();
    let store = JsonFileStore::in_dir(temp.path()).unwrap();
    fs::write(store.path(), "{ not json").unwrap();

    let outcome = store.load();
    assert!(matches!(outcome.status, LoadStatus::Corrupt(_)));
    assert!(outcome.status.is_recovered());
    assert_eq!(outcome.document, FinancialDocument::default());
}

#[test]
fn clear_removes_document() {
    let temp = tempdir().unwrap();
    let store = JsonFileStore::in_dir(temp.path()).unwrap();
    store.save(&common::march_scenario()).unwrap();
    store.clear().unwrap();

    assert!(!store.path().exists());
    assert_eq!(store.load().status, LoadStatus::Missing);
    // Clearing an empty slot is fine.
    store.clear().unwrap();
}

#[test]
fn legacy_null_amounts_load_as_zero() {
    let temp = tempdir().unwrap();
    let store = JsonFileStore::in_dir(temp.path()).unwrap();
    let legacy = r#"{
        "vendas": [{"id":"a","data":"2024-03-05","descricao":"Bolo","categoria":"Bolo",
                    "quantidade":1,"valorTotal":null,"formaPagamento":"Pix"}],
        "despesas": [],
        "config": {"metaLucroMensal": 3000}
    }"#;
    fs::write(store.path(), legacy).unwrap();

    let outcome = store.load();
    assert_eq!(outcome.status, LoadStatus::Loaded);
    assert_eq!(outcome.document.sales[0].total_value, 0.0);
}
