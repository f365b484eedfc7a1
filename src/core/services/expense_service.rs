//! Validated lifecycle helpers for expenses.

use tracing::debug;

use crate::core::services::{RecordQuery, ServiceError, ServiceResult};
use crate::domain::{Expense, ExpenseCategory, ExpenseDraft, FinancialDocument};
use crate::errors::ValidationError;

pub struct ExpenseService;

impl ExpenseService {
    pub fn add(doc: &mut FinancialDocument, draft: ExpenseDraft) -> ServiceResult<String> {
        let expense = draft.into_expense()?;
        if doc.expense(&expense.id).is_some() {
            return Err(ValidationError::DuplicateId {
                kind: "expense",
                id: expense.id,
            }
            .into());
        }
        let id = expense.id.clone();
        doc.prepend_expense(expense);
        debug!(%id, "expense added");
        Ok(id)
    }

    pub fn update(
        doc: &mut FinancialDocument,
        id: &str,
        draft: ExpenseDraft,
    ) -> ServiceResult<()> {
        if doc.expense(id).is_none() {
            return Err(not_found(id));
        }
        let expense = draft.into_expense_with_id(id.to_string())?;
        doc.replace_expense(expense);
        debug!(%id, "expense updated");
        Ok(())
    }

    pub fn remove(doc: &mut FinancialDocument, id: &str) -> ServiceResult<Expense> {
        let removed = doc.remove_expense(id).ok_or_else(|| not_found(id))?;
        debug!(%id, "expense removed");
        Ok(removed)
    }

    pub fn find<'a>(doc: &'a FinancialDocument, id: &str) -> ServiceResult<&'a Expense> {
        doc.expense(id).ok_or_else(|| not_found(id))
    }

    pub fn filter<'a>(
        doc: &'a FinancialDocument,
        query: &RecordQuery<ExpenseCategory>,
    ) -> Vec<&'a Expense> {
        doc.expenses
            .iter()
            .filter(|expense| query.matches(&expense.description, &expense.category))
            .collect()
    }
}

fn not_found(id: &str) -> ServiceError {
    ServiceError::NotFound {
        kind: "expense",
        id: id.to_string(),
    }
}
