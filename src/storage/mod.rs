//! Single-slot persistence for the [`FinancialDocument`].
//!
//! Backends only move raw text in and out of their slot; the load/save/clear
//! contract (including the fallback to a default document) lives in the
//! provided methods of [`DocumentStore`] so every backend behaves the same.

pub mod json_backend;
pub mod memory;

use tracing::{debug, warn};

use crate::domain::FinancialDocument;
use crate::errors::StorageError;

pub use json_backend::{JsonFileStore, STORAGE_KEY};
pub use memory::MemoryStore;

pub type Result<T> = std::result::Result<T, StorageError>;

/// How the document returned by [`DocumentStore::load`] came to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// The persisted payload parsed cleanly.
    Loaded,
    /// Nothing persisted yet; a default document was synthesized.
    Missing,
    /// A payload exists but is not a valid document; the default replaced it.
    Corrupt(String),
    /// The slot could not be read at all; the default replaced it.
    Unreadable(String),
}

impl LoadStatus {
    pub fn is_recovered(&self) -> bool {
        matches!(self, LoadStatus::Corrupt(_) | LoadStatus::Unreadable(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    pub document: FinancialDocument,
    pub status: LoadStatus,
    /// Problems found in a document that still loaded.
    pub warnings: Vec<String>,
}

impl LoadOutcome {
    fn fallback(status: LoadStatus) -> Self {
        Self {
            document: FinancialDocument::default(),
            status,
            warnings: Vec::new(),
        }
    }
}

/// Abstraction over the storage slot holding the serialized document.
pub trait DocumentStore: Send + Sync {
    /// Returns the raw payload, or `None` when the slot is empty.
    fn read_slot(&self) -> Result<Option<String>>;

    /// Replaces the slot contents; readers must never observe a partial write.
    fn write_slot(&self, payload: &str) -> Result<()>;

    fn remove_slot(&self) -> Result<()>;

    /// Moves the current payload aside under `label` so a later write cannot
    /// destroy it. Returns where it went, or `None` when the slot was empty.
    fn quarantine_slot(&self, label: &str) -> Result<Option<String>>;

    /// Loads the persisted document. Never fails: missing, unreadable or
    /// corrupt payloads yield the default document and a matching status.
    fn load(&self) -> LoadOutcome {
        let raw = match self.read_slot() {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("no persisted document, starting from defaults");
                return LoadOutcome::fallback(LoadStatus::Missing);
            }
            Err(err) => {
                warn!(error = %err, "failed to read persisted document, using defaults");
                return LoadOutcome::fallback(LoadStatus::Unreadable(err.to_string()));
            }
        };
        match serde_json::from_str::<FinancialDocument>(&raw) {
            Ok(document) => {
                debug!(
                    sales = document.sales.len(),
                    expenses = document.expenses.len(),
                    "loaded persisted document"
                );
                let mut warnings = Vec::new();
                if let Some((kind, id)) = document.first_duplicate_id() {
                    warn!(kind, %id, "persisted document has duplicate ids");
                    warnings.push(format!("duplicate {kind} id `{id}`"));
                }
                LoadOutcome {
                    document,
                    status: LoadStatus::Loaded,
                    warnings,
                }
            }
            Err(err) => {
                warn!(error = %err, "persisted document is corrupt, using defaults");
                LoadOutcome::fallback(LoadStatus::Corrupt(err.to_string()))
            }
        }
    }

    /// Serializes and persists the whole document, overwriting prior state.
    fn save(&self, document: &FinancialDocument) -> Result<()> {
        let payload = serde_json::to_string(document)?;
        self.write_slot(&payload)
    }

    /// Drops the persisted document; the next load yields the default.
    fn clear(&self) -> Result<()> {
        self.remove_slot()
    }
}
