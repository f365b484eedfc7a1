use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::core::services::{
    ExpenseService, SaleService, ServiceResult, SummaryService, TransferService,
    DEFAULT_RECENT_LIMIT,
};
use crate::domain::{
    Config, Expense, ExpenseDraft, FinancialDocument, MonthDashboard, MonthKey, MonthlyHistoryRow,
    Sale, SaleDraft,
};
use crate::errors::{ImportError, ValidationError};
use crate::report::MonthlyReport;
use crate::storage::{self, DocumentStore, LoadOutcome, LoadStatus};

const QUARANTINE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Outcome of the most recent persistence attempt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WriteStatus {
    /// Nothing has been written since the document was loaded.
    #[default]
    Idle,
    Saved,
    /// The write failed; the in-memory document is still authoritative.
    Failed(String),
}

impl WriteStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, WriteStatus::Failed(_))
    }
}

/// Owns the current document and threads it through the services, writing
/// the whole document back through the store after every mutation.
///
/// Readers take an [`Arc`] snapshot; mutations build a new document value and
/// swap it in, so a snapshot never changes under its holder.
pub struct Bookkeeper<S: DocumentStore> {
    store: S,
    document: Arc<FinancialDocument>,
    load_status: LoadStatus,
    load_warnings: Vec<String>,
    write_status: WriteStatus,
    recent_limit: usize,
    /// Set while the slot still holds a payload that failed to load; it is
    /// moved aside before the first write.
    unreadable_pending: bool,
    preserved_copy: Option<String>,
}

impl<S: DocumentStore> Bookkeeper<S> {
    /// Loads the persisted document, falling back to defaults.
    pub fn open(store: S) -> Self {
        let outcome = store.load();
        info!(
            status = ?outcome.status,
            sales = outcome.document.sales.len(),
            expenses = outcome.document.expenses.len(),
            "bookkeeper opened"
        );
        let mut bookkeeper = Self {
            store,
            document: Arc::default(),
            load_status: LoadStatus::Missing,
            load_warnings: Vec::new(),
            write_status: WriteStatus::Idle,
            recent_limit: DEFAULT_RECENT_LIMIT,
            unreadable_pending: false,
            preserved_copy: None,
        };
        bookkeeper.apply_load(outcome);
        bookkeeper
    }

    /// Like [`Bookkeeper::open`], applying host settings. A document that was
    /// not loaded from storage starts with the configured default goal.
    pub fn open_with_settings(store: S, settings: &Settings) -> Self {
        let mut bookkeeper = Self::open(store);
        bookkeeper.recent_limit = settings.recent_limit;
        if bookkeeper.load_status != LoadStatus::Loaded {
            let goal = settings.effective_monthly_goal();
            Arc::make_mut(&mut bookkeeper.document).config = Config { monthly_goal: goal };
        }
        bookkeeper
    }

    pub fn snapshot(&self) -> Arc<FinancialDocument> {
        Arc::clone(&self.document)
    }

    pub fn document(&self) -> &FinancialDocument {
        &self.document
    }

    pub fn load_status(&self) -> &LoadStatus {
        &self.load_status
    }

    pub fn load_warnings(&self) -> &[String] {
        &self.load_warnings
    }

    /// Where an unreadable payload was moved before it could be overwritten.
    pub fn preserved_copy(&self) -> Option<&str> {
        self.preserved_copy.as_deref()
    }

    pub fn write_status(&self) -> &WriteStatus {
        &self.write_status
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn recent_limit(&self) -> usize {
        self.recent_limit
    }

    /// Discards in-memory state and reads the store again.
    pub fn reload(&mut self) {
        let outcome = self.store.load();
        self.apply_load(outcome);
        self.write_status = WriteStatus::Idle;
    }

    pub fn add_sale(&mut self, draft: SaleDraft) -> ServiceResult<String> {
        self.mutate(|doc| SaleService::add(doc, draft))
    }

    pub fn update_sale(&mut self, id: &str, draft: SaleDraft) -> ServiceResult<()> {
        self.mutate(|doc| SaleService::update(doc, id, draft))
    }

    pub fn delete_sale(&mut self, id: &str) -> ServiceResult<Sale> {
        self.mutate(|doc| SaleService::remove(doc, id))
    }

    pub fn add_expense(&mut self, draft: ExpenseDraft) -> ServiceResult<String> {
        self.mutate(|doc| ExpenseService::add(doc, draft))
    }

    pub fn update_expense(&mut self, id: &str, draft: ExpenseDraft) -> ServiceResult<()> {
        self.mutate(|doc| ExpenseService::update(doc, id, draft))
    }

    pub fn delete_expense(&mut self, id: &str) -> ServiceResult<Expense> {
        self.mutate(|doc| ExpenseService::remove(doc, id))
    }

    pub fn set_monthly_goal(&mut self, goal: f64) -> Result<(), ValidationError> {
        self.mutate(|doc| doc.config.set_monthly_goal(goal))?;
        debug!(goal, "monthly goal updated");
        Ok(())
    }

    /// Replaces the whole document with a validated backup. On rejection the
    /// current document is left exactly as it was.
    pub fn import_payload(&mut self, payload: &[u8]) -> Result<(), ImportError> {
        let imported = TransferService::import_document(payload)?;
        self.replace_document(imported);
        Ok(())
    }

    pub fn import_from_path(&mut self, path: &Path) -> Result<(), ImportError> {
        let imported = TransferService::import_from_path(path)?;
        self.replace_document(imported);
        Ok(())
    }

    pub fn export_payload(&self) -> serde_json::Result<Vec<u8>> {
        TransferService::export_document(&self.document)
    }

    pub fn export_to_dir(
        &self,
        dir: &Path,
        identifier: &str,
        date: NaiveDate,
    ) -> storage::Result<PathBuf> {
        TransferService::export_to_dir(&self.document, dir, identifier, date)
    }

    /// Drops every record and the persisted slot. Failing to remove the slot
    /// is recorded like any other failed write.
    pub fn clear_all(&mut self) {
        self.document = Arc::new(FinancialDocument::default());
        self.unreadable_pending = false;
        self.write_status = match self.store.clear() {
            Ok(()) => {
                info!("all data cleared");
                WriteStatus::Saved
            }
            Err(err) => {
                warn!(error = %err, "failed to clear persisted document");
                WriteStatus::Failed(err.to_string())
            }
        };
    }

    pub fn dashboard(&self, month: MonthKey) -> MonthDashboard<'_> {
        SummaryService::dashboard(&self.document, month, self.recent_limit)
    }

    pub fn monthly_history(&self) -> Vec<MonthlyHistoryRow> {
        SummaryService::monthly_history(&self.document)
    }

    pub fn report(&self, generated_on: NaiveDate) -> MonthlyReport {
        MonthlyReport::build(&self.document, generated_on)
    }

    fn apply_load(&mut self, outcome: LoadOutcome) {
        self.document = Arc::new(outcome.document);
        self.unreadable_pending = outcome.status.is_recovered();
        self.load_status = outcome.status;
        self.load_warnings = outcome.warnings;
    }

    fn replace_document(&mut self, document: FinancialDocument) {
        info!(
            sales = document.sales.len(),
            expenses = document.expenses.len(),
            "document replaced by import"
        );
        self.document = Arc::new(document);
        self.persist();
    }

    fn mutate<T, E>(
        &mut self,
        op: impl FnOnce(&mut FinancialDocument) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut next = FinancialDocument::clone(&self.document);
        let output = op(&mut next)?;
        self.document = Arc::new(next);
        self.persist();
        Ok(output)
    }

    fn persist(&mut self) {
        if self.unreadable_pending {
            if let Err(err) = self.preserve_unreadable() {
                warn!(error = %err, "could not move unreadable document aside, not writing");
                self.write_status =
                    WriteStatus::Failed(format!("unreadable document not preserved: {err}"));
                return;
            }
        }
        self.write_status = match self.store.save(&self.document) {
            Ok(()) => WriteStatus::Saved,
            Err(err) => {
                warn!(error = %err, "failed to persist document, keeping in-memory state");
                WriteStatus::Failed(err.to_string())
            }
        };
    }

    fn preserve_unreadable(&mut self) -> storage::Result<()> {
        let label = Utc::now().format(QUARANTINE_TIMESTAMP_FORMAT).to_string();
        if let Some(location) = self.store.quarantine_slot(&label)? {
            warn!(%location, "unreadable document preserved before first write");
            self.preserved_copy = Some(location);
        }
        self.unreadable_pending = false;
        Ok(())
    }
}
