pub mod common;
pub mod document;
pub mod expense;
pub mod sale;
pub mod summary;

pub use common::{Identifiable, LedgerEntry, MonthKey, RecordDate};
pub use document::{Config, FinancialDocument, DEFAULT_MONTHLY_GOAL};
pub use expense::{Expense, ExpenseCategory, ExpenseDraft, ExpenseKind};
pub use sale::{PaymentMethod, Sale, SaleCategory, SaleDraft};
pub use summary::{
    DailyPoint, GoalProgress, MonthDashboard, MonthSlice, MonthTotals, MonthlyHistoryRow,
    TransactionEntry, TransactionKind,
};
