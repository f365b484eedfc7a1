#![allow(dead_code)]

use std::sync::Mutex;

use doce_gestao::{
    domain::{ExpenseDraft, FinancialDocument, SaleDraft},
    Bookkeeper, JsonFileStore,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Fresh directory that outlives the calling test.
pub fn test_dir() -> std::path::PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

/// Bookkeeper over an isolated on-disk store.
pub fn setup_bookkeeper() -> Bookkeeper<JsonFileStore> {
    let store = JsonFileStore::in_dir(test_dir()).expect("create json store");
    Bookkeeper::open(store)
}

pub fn sale(date: &str, value: f64) -> SaleDraft {
    SaleDraft::new(date, value).description(format!("Venda {date}"))
}

pub fn expense(date: &str, value: f64) -> ExpenseDraft {
    ExpenseDraft::new(date, value).description(format!("Despesa {date}"))
}

/// One sale of 100 and one expense of 40, both on 2024-03-05.
pub fn march_scenario() -> FinancialDocument {
    let mut doc = FinancialDocument::default();
    doc.prepend_sale(sale("2024-03-05", 100.0).into_sale().expect("valid sale"));
    doc.prepend_expense(
        expense("2024-03-05", 40.0)
            .into_expense()
            .expect("valid expense"),
    );
    doc
}
