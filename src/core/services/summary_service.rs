//! Aggregation engine: pure functions from a document snapshot to the month,
//! daily and historical views. Nothing here fails on empty input or zero
//! divisors; such cases degrade to zero or empty results.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use crate::currency::{round_cents, sanitize_amount};
use crate::domain::{
    DailyPoint, FinancialDocument, GoalProgress, LedgerEntry, MonthDashboard, MonthKey,
    MonthSlice, MonthTotals, MonthlyHistoryRow, TransactionEntry,
};

/// Default number of rows in the recent-activity list.
pub const DEFAULT_RECENT_LIMIT: usize = 5;

pub struct SummaryService;

impl SummaryService {
    /// Records whose `YYYY-MM` prefix equals `month`, in stored order.
    pub fn filter_by_month<'a>(doc: &'a FinancialDocument, month: MonthKey) -> MonthSlice<'a> {
        let key = month.to_string();
        MonthSlice {
            month,
            sales: doc
                .sales
                .iter()
                .filter(|sale| sale.date.month_key() == key)
                .collect(),
            expenses: doc
                .expenses
                .iter()
                .filter(|expense| expense.date.month_key() == key)
                .collect(),
        }
    }

    pub fn month_totals(slice: &MonthSlice<'_>) -> MonthTotals {
        let revenue = sum_amounts(slice.sales.iter().copied());
        let cost = sum_amounts(slice.expenses.iter().copied());
        MonthTotals::from_parts(revenue, cost)
    }

    /// One point per calendar day of the slice's month, including idle days.
    pub fn daily_series(slice: &MonthSlice<'_>) -> Vec<DailyPoint> {
        let mut buckets: HashMap<&str, (f64, f64)> = HashMap::new();
        for sale in &slice.sales {
            buckets.entry(sale.date.day_key()).or_default().0 += sanitize_amount(sale.total_value);
        }
        for expense in &slice.expenses {
            buckets.entry(expense.date.day_key()).or_default().1 += sanitize_amount(expense.value);
        }

        (1..=slice.month.days_in_month())
            .map(|day| {
                let key = slice.month.day_key(day);
                let (revenue, expense) = buckets.get(key.as_str()).copied().unwrap_or_default();
                let revenue = round_cents(revenue);
                let expense = round_cents(expense);
                DailyPoint {
                    day,
                    revenue,
                    expense,
                    profit: round_cents(revenue - expense),
                }
            })
            .collect()
    }

    /// Raw, unclamped `profit / goal * 100`. A goal that is zero, negative or
    /// not finite yields `0.0`.
    pub fn goal_progress(profit: f64, monthly_goal: f64) -> f64 {
        if !monthly_goal.is_finite() || monthly_goal <= 0.0 || !profit.is_finite() {
            return 0.0;
        }
        profit * 100.0 / monthly_goal
    }

    pub fn goal_summary(profit: f64, monthly_goal: f64) -> GoalProgress {
        let percent = Self::goal_progress(profit, monthly_goal);
        let remaining = if monthly_goal.is_finite() && profit.is_finite() {
            (monthly_goal - profit).max(0.0)
        } else {
            0.0
        };
        GoalProgress {
            percent,
            display_percent: percent.clamp(0.0, 100.0),
            remaining,
            reached: percent >= 100.0,
        }
    }

    pub fn average_per_day(profit: f64, total_days: usize) -> f64 {
        average(profit, total_days)
    }

    /// Zero when no day had movement.
    pub fn average_per_active_day(profit: f64, active_days: usize) -> f64 {
        average(profit, active_days)
    }

    /// Days with any revenue or expense.
    pub fn active_days(daily: &[DailyPoint]) -> usize {
        daily.iter().filter(|point| point.has_movement()).count()
    }

    /// Latest `limit` movements of the slice, most recent first.
    pub fn recent_transactions<'a>(
        slice: &MonthSlice<'a>,
        limit: usize,
    ) -> Vec<TransactionEntry<'a>> {
        let entries = slice
            .sales
            .iter()
            .copied()
            .map(TransactionEntry::Sale)
            .chain(slice.expenses.iter().copied().map(TransactionEntry::Expense))
            .collect();
        let mut sorted = sort_descending(entries);
        sorted.truncate(limit);
        sorted
    }

    /// Every sale and expense of the document, most recent first.
    pub fn all_transactions(doc: &FinancialDocument) -> Vec<TransactionEntry<'_>> {
        let entries = doc
            .sales
            .iter()
            .map(TransactionEntry::Sale)
            .chain(doc.expenses.iter().map(TransactionEntry::Expense))
            .collect();
        sort_descending(entries)
    }

    /// Per-month totals over the whole document, newest month first. Months
    /// without records never appear.
    pub fn monthly_history(doc: &FinancialDocument) -> Vec<MonthlyHistoryRow> {
        let mut months: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
        for sale in &doc.sales {
            months.entry(sale.date.month_key()).or_default().0 += sanitize_amount(sale.total_value);
        }
        for expense in &doc.expenses {
            months.entry(expense.date.month_key()).or_default().1 +=
                sanitize_amount(expense.value);
        }

        months
            .into_iter()
            .rev()
            .map(|(month, (revenue, expense))| {
                let revenue = round_cents(revenue);
                let expense = round_cents(expense);
                MonthlyHistoryRow {
                    month: month.to_string(),
                    revenue,
                    expense,
                    profit: round_cents(revenue - expense),
                }
            })
            .collect()
    }

    /// Grand totals across every history row.
    pub fn history_totals(rows: &[MonthlyHistoryRow]) -> MonthTotals {
        let revenue = round_cents(rows.iter().map(|row| row.revenue).sum());
        let cost = round_cents(rows.iter().map(|row| row.expense).sum());
        MonthTotals::from_parts(revenue, cost)
    }

    /// Bundles the month view: totals, daily series, goal and recent list.
    pub fn dashboard<'a>(
        doc: &'a FinancialDocument,
        month: MonthKey,
        recent_limit: usize,
    ) -> MonthDashboard<'a> {
        let slice = Self::filter_by_month(doc, month);
        let totals = Self::month_totals(&slice);
        let daily = Self::daily_series(&slice);
        let active_days = Self::active_days(&daily);
        MonthDashboard {
            month,
            totals,
            goal: Self::goal_summary(totals.profit, doc.config.monthly_goal),
            active_days,
            average_per_day: Self::average_per_day(totals.profit, daily.len()),
            average_per_active_day: Self::average_per_active_day(totals.profit, active_days),
            recent: Self::recent_transactions(&slice, recent_limit),
            daily,
        }
    }
}

fn sum_amounts<'a, E, I>(entries: I) -> f64
where
    E: LedgerEntry + 'a,
    I: Iterator<Item = &'a E>,
{
    round_cents(entries.map(|entry| sanitize_amount(entry.amount())).sum())
}

fn average(total: f64, count: usize) -> f64 {
    if count == 0 || !total.is_finite() {
        0.0
    } else {
        total / count as f64
    }
}

/// Stable sort on the parsed timestamp, newest first; equal timestamps keep
/// their input order and unparseable ones sink to the end. Each timestamp is
/// parsed once.
fn sort_descending(mut entries: Vec<TransactionEntry<'_>>) -> Vec<TransactionEntry<'_>> {
    entries.sort_by_cached_key(|entry| Reverse(entry.timestamp()));
    entries
}
