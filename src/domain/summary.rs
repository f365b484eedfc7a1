//! Derived views produced by the aggregation engine.

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::currency::round_cents;
use crate::domain::common::{LedgerEntry, MonthKey, RecordDate};
use crate::domain::expense::Expense;
use crate::domain::sale::Sale;

/// Sales and expenses whose timestamp falls in one month, in stored order.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthSlice<'a> {
    pub month: MonthKey,
    pub sales: Vec<&'a Sale>,
    pub expenses: Vec<&'a Expense>,
}

impl MonthSlice<'_> {
    pub fn is_empty(&self) -> bool {
        self.sales.is_empty() && self.expenses.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MonthTotals {
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
}

impl MonthTotals {
    pub fn from_parts(revenue: f64, cost: f64) -> Self {
        Self {
            revenue,
            cost,
            profit: round_cents(revenue - cost),
        }
    }
}

/// One calendar day of the daily series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyPoint {
    pub day: u32,
    pub revenue: f64,
    pub expense: f64,
    pub profit: f64,
}

impl DailyPoint {
    pub fn has_movement(&self) -> bool {
        self.revenue != 0.0 || self.expense != 0.0
    }
}

/// One month of the all-time history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyHistoryRow {
    /// Raw `YYYY-MM` prefix of the grouped timestamps.
    pub month: String,
    pub revenue: f64,
    pub expense: f64,
    pub profit: f64,
}

impl MonthlyHistoryRow {
    /// Parsed month, when the grouped prefix is a well-formed key.
    pub fn month_key(&self) -> Option<MonthKey> {
        self.month.parse().ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GoalProgress {
    /// Raw `profit / goal * 100`; may be negative or above 100.
    pub percent: f64,
    /// `percent` clamped to `0..=100` for progress bars.
    pub display_percent: f64,
    /// Profit still missing to reach the goal, never negative.
    pub remaining: f64,
    pub reached: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Sale,
    Expense,
}

impl TransactionKind {
    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Sale => "Venda",
            TransactionKind::Expense => "Despesa",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A sale or an expense in a merged, time-ordered listing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransactionEntry<'a> {
    Sale(&'a Sale),
    Expense(&'a Expense),
}

impl<'a> TransactionEntry<'a> {
    pub fn kind(&self) -> TransactionKind {
        match self {
            TransactionEntry::Sale(_) => TransactionKind::Sale,
            TransactionEntry::Expense(_) => TransactionKind::Expense,
        }
    }

    fn entry(&self) -> &'a dyn LedgerEntry {
        match *self {
            TransactionEntry::Sale(sale) => sale,
            TransactionEntry::Expense(expense) => expense,
        }
    }

    pub fn id(&self) -> &'a str {
        self.entry().id()
    }

    pub fn date(&self) -> &'a RecordDate {
        self.entry().date()
    }

    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        self.date().to_datetime()
    }

    pub fn description(&self) -> &'a str {
        self.entry().description()
    }

    pub fn category_label(&self) -> &'static str {
        self.entry().category_label()
    }

    /// Stored amount, always positive in well-formed data.
    pub fn amount(&self) -> f64 {
        self.entry().amount()
    }

    /// Amount with the sign of its effect on profit.
    pub fn signed_amount(&self) -> f64 {
        match self.kind() {
            TransactionKind::Sale => self.amount(),
            TransactionKind::Expense => -self.amount(),
        }
    }
}

/// Everything a month dashboard renders.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthDashboard<'a> {
    pub month: MonthKey,
    pub totals: MonthTotals,
    pub daily: Vec<DailyPoint>,
    pub goal: GoalProgress,
    pub active_days: usize,
    pub average_per_day: f64,
    pub average_per_active_day: f64,
    pub recent: Vec<TransactionEntry<'a>>,
}
