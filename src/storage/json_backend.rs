use std::{
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use super::{DocumentStore, Result};

/// Well-known slot name; kept from the browser build for compatibility.
pub const STORAGE_KEY: &str = "doce_gestao_data";
const SLOT_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// Filesystem-backed slot: one JSON file per installation.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Uses `<dir>/doce_gestao_data.json`, creating `dir` when needed.
    pub fn in_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        Ok(Self {
            path: dir.join(format!("{STORAGE_KEY}.{SLOT_EXTENSION}")),
        })
    }

    /// Uses an explicit file path for the slot.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file that receives a quarantined payload, e.g.
    /// `doce_gestao_data.corrupt-20240305_101500.json`.
    pub fn quarantine_path(&self, label: &str) -> PathBuf {
        let stem = self
            .path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(STORAGE_KEY);
        self.path
            .with_file_name(format!("{stem}.corrupt-{label}.{SLOT_EXTENSION}"))
    }
}

impl DocumentStore for JsonFileStore {
    fn read_slot(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write_slot(&self, payload: &str) -> Result<()> {
        write_atomic(&self.path, payload)?;
        debug!(path = %self.path.display(), bytes = payload.len(), "document persisted");
        Ok(())
    }

    fn remove_slot(&self) -> Result<()> {
        for path in [self.path.clone(), tmp_path(&self.path)] {
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(err) if err.kind() == ErrorKind::NotFound => {}
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }

    fn quarantine_slot(&self, label: &str) -> Result<Option<String>> {
        let target = self.quarantine_path(label);
        match fs::rename(&self.path, &target) {
            Ok(()) => {
                warn!(path = %target.display(), "unreadable document moved aside");
                Ok(Some(target.display().to_string()))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

/// Stages the payload next to the target and renames it into place, so the
/// previous file stays intact if any step fails.
pub(crate) fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    file.sync_all()?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ExpenseDraft, FinancialDocument};
    use crate::storage::LoadStatus;
    use tempfile::TempDir;

    fn store_with_temp_dir() -> (JsonFileStore, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let store = JsonFileStore::in_dir(temp.path()).expect("json store");
        (store, temp)
    }

    #[test]
    fn slot_lives_under_storage_key() {
        let (store, _guard) = store_with_temp_dir();
        let name = store.path().file_name().and_then(|n| n.to_str()).unwrap();
        assert_eq!(name, "doce_gestao_data.json");
    }

    #[test]
    fn save_and_load_roundtrip() {
        let (store, _guard) = store_with_temp_dir();
        let mut doc = FinancialDocument::default();
        doc.prepend_expense(ExpenseDraft::new("2024-03-05", 40.0).into_expense().unwrap());
        store.save(&doc).expect("save");

        let outcome = store.load();
        assert_eq!(outcome.status, LoadStatus::Loaded);
        assert_eq!(outcome.document, doc);
        assert!(!tmp_path(store.path()).exists());
    }

    #[test]
    fn clear_removes_slot_and_is_repeatable() {
        let (store, _guard) = store_with_temp_dir();
        store.save(&FinancialDocument::default()).unwrap();
        store.clear().unwrap();
        assert!(!store.path().exists());
        store.clear().unwrap();
        assert_eq!(store.load().status, LoadStatus::Missing);
    }

    #[test]
    fn failed_write_keeps_previous_file() {
        let (store, _guard) = store_with_temp_dir();
        store.save(&FinancialDocument::default()).unwrap();
        let original = fs::read_to_string(store.path()).unwrap();

        // A directory squatting on the temp name makes File::create fail.
        fs::create_dir_all(tmp_path(store.path())).unwrap();
        let mut doc = FinancialDocument::default();
        doc.config.monthly_goal = 5000.0;
        assert!(store.save(&doc).is_err());

        assert_eq!(fs::read_to_string(store.path()).unwrap(), original);
    }

    #[test]
    fn quarantine_renames_slot_next_to_it() {
        let (store, _guard) = store_with_temp_dir();
        fs::write(store.path(), "{ broken").unwrap();

        let location = store.quarantine_slot("20240305_101500").unwrap();
        let moved = store.quarantine_path("20240305_101500");
        assert_eq!(location, Some(moved.display().to_string()));
        assert_eq!(
            moved.file_name().and_then(|n| n.to_str()),
            Some("doce_gestao_data.corrupt-20240305_101500.json")
        );
        assert_eq!(fs::read_to_string(&moved).unwrap(), "{ broken");
        assert!(!store.path().exists());
        assert_eq!(store.quarantine_slot("later").unwrap(), None);
    }
}
