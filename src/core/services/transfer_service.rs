//! Backup export and all-or-nothing import of the whole document.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{info, warn};

use crate::domain::FinancialDocument;
use crate::errors::ImportError;
use crate::storage::{json_backend::write_atomic, Result as StorageResult};

const REQUIRED_FIELDS: [&str; 3] = ["vendas", "despesas", "config"];

pub struct TransferService;

impl TransferService {
    /// Human-readable JSON holding the entire document.
    pub fn export_document(doc: &FinancialDocument) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec_pretty(doc)
    }

    /// Parses and validates an external backup. The caller's document is
    /// never involved, so a rejection cannot leave it half-merged.
    pub fn import_document(payload: &[u8]) -> Result<FinancialDocument, ImportError> {
        let result = Self::decode(payload);
        if let Err(err) = &result {
            warn!(error = %err, "backup rejected");
        }
        result
    }

    pub fn backup_file_name(identifier: &str, date: NaiveDate) -> String {
        format!("backup_{}_{}.json", identifier, date.format("%Y-%m-%d"))
    }

    /// Writes `backup_<identifier>_<date>.json` into `dir` and returns its path.
    pub fn export_to_dir(
        doc: &FinancialDocument,
        dir: &Path,
        identifier: &str,
        date: NaiveDate,
    ) -> StorageResult<PathBuf> {
        let path = dir.join(Self::backup_file_name(identifier, date));
        let payload = serde_json::to_string_pretty(doc)?;
        write_atomic(&path, &payload)?;
        info!(path = %path.display(), "backup exported");
        Ok(path)
    }

    pub fn import_from_path(path: &Path) -> Result<FinancialDocument, ImportError> {
        let payload = fs::read(path).map_err(|err| {
            warn!(path = %path.display(), error = %err, "backup file unreadable");
            ImportError::from(err)
        })?;
        Self::import_document(&payload)
    }

    fn decode(payload: &[u8]) -> Result<FinancialDocument, ImportError> {
        let value: Value = serde_json::from_slice(payload)?;
        let object = value.as_object().ok_or(ImportError::NotAnObject)?;

        let missing: Vec<&'static str> = REQUIRED_FIELDS
            .into_iter()
            .filter(|field| !object.get(*field).is_some_and(is_truthy))
            .collect();
        if !missing.is_empty() {
            return Err(ImportError::MissingFields(missing));
        }

        let document: FinancialDocument = serde_json::from_value(value)?;
        if let Some((kind, id)) = document.first_duplicate_id() {
            return Err(ImportError::DuplicateId { kind, id });
        }
        Ok(document)
    }
}

// Empty arrays and objects count as present; only null, false, zero and ""
// are treated as absent.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
