//! The single persisted aggregate: every sale, every expense and the config.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::common::{lenient_amount, Identifiable};
use crate::domain::expense::Expense;
use crate::domain::sale::Sale;
use crate::errors::ValidationError;

pub const DEFAULT_MONTHLY_GOAL: f64 = 3000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(
        rename = "metaLucroMensal",
        deserialize_with = "lenient_amount",
        default = "Config::default_monthly_goal"
    )]
    pub monthly_goal: f64,
}

impl Config {
    pub fn default_monthly_goal() -> f64 {
        DEFAULT_MONTHLY_GOAL
    }

    pub fn with_goal(goal: f64) -> Result<Self, ValidationError> {
        let mut config = Self::default();
        config.set_monthly_goal(goal)?;
        Ok(config)
    }

    /// Zero, negative and non-finite goals are refused.
    pub fn set_monthly_goal(&mut self, goal: f64) -> Result<(), ValidationError> {
        if !goal.is_finite() || goal <= 0.0 {
            return Err(ValidationError::InvalidGoal(goal));
        }
        self.monthly_goal = goal;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            monthly_goal: DEFAULT_MONTHLY_GOAL,
        }
    }
}

/// Field names are fixed by the persisted layout
/// `{ vendas, despesas, config: { metaLucroMensal } }`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FinancialDocument {
    #[serde(rename = "vendas", default)]
    pub sales: Vec<Sale>,
    #[serde(rename = "despesas", default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub config: Config,
}

impl FinancialDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sales.is_empty() && self.expenses.is_empty()
    }

    pub fn sale(&self, id: &str) -> Option<&Sale> {
        self.sales.iter().find(|sale| sale.id == id)
    }

    pub fn expense(&self, id: &str) -> Option<&Expense> {
        self.expenses.iter().find(|expense| expense.id == id)
    }

    /// New records go to the front, matching the display order.
    pub fn prepend_sale(&mut self, sale: Sale) {
        self.sales.insert(0, sale);
    }

    pub fn prepend_expense(&mut self, expense: Expense) {
        self.expenses.insert(0, expense);
    }

    /// Replaces the sale with the same id in place; `false` when absent.
    pub fn replace_sale(&mut self, sale: Sale) -> bool {
        match self.sales.iter_mut().find(|current| current.id == sale.id) {
            Some(slot) => {
                *slot = sale;
                true
            }
            None => false,
        }
    }

    pub fn replace_expense(&mut self, expense: Expense) -> bool {
        match self
            .expenses
            .iter_mut()
            .find(|current| current.id == expense.id)
        {
            Some(slot) => {
                *slot = expense;
                true
            }
            None => false,
        }
    }

    pub fn remove_sale(&mut self, id: &str) -> Option<Sale> {
        let index = self.sales.iter().position(|sale| sale.id == id)?;
        Some(self.sales.remove(index))
    }

    pub fn remove_expense(&mut self, id: &str) -> Option<Expense> {
        let index = self.expenses.iter().position(|expense| expense.id == id)?;
        Some(self.expenses.remove(index))
    }

    /// First id that appears twice within its collection, tagged with the
    /// collection kind.
    pub fn first_duplicate_id(&self) -> Option<(&'static str, String)> {
        first_duplicate(&self.sales)
            .map(|id| ("sale", id))
            .or_else(|| first_duplicate(&self.expenses).map(|id| ("expense", id)))
    }
}

fn first_duplicate<T: Identifiable>(records: &[T]) -> Option<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .map(Identifiable::id)
        .find(|id| !seen.insert(*id))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sale::SaleDraft;

    #[test]
    fn default_document_matches_first_run_layout() {
        let doc = FinancialDocument::default();
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "vendas": [],
                "despesas": [],
                "config": { "metaLucroMensal": 3000.0 }
            })
        );
    }

    #[test]
    fn config_rejects_zero_goal() {
        let mut config = Config::default();
        assert_eq!(
            config.set_monthly_goal(0.0),
            Err(ValidationError::InvalidGoal(0.0))
        );
        assert_eq!(config.monthly_goal, DEFAULT_MONTHLY_GOAL);
        config.set_monthly_goal(4500.0).unwrap();
        assert_eq!(config.monthly_goal, 4500.0);
    }

    #[test]
    fn replace_and_remove_by_id() {
        let mut doc = FinancialDocument::new();
        let sale = SaleDraft::new("2024-03-05", 10.0).into_sale().unwrap();
        let id = sale.id.clone();
        doc.prepend_sale(sale.clone());

        let mut edited = sale;
        edited.total_value = 25.0;
        assert!(doc.replace_sale(edited));
        assert_eq!(doc.sale(&id).unwrap().total_value, 25.0);

        assert!(doc.remove_sale(&id).is_some());
        assert!(doc.remove_sale(&id).is_none());
    }

    #[test]
    fn detects_duplicate_ids() {
        let mut doc = FinancialDocument::new();
        let sale = SaleDraft::new("2024-03-05", 10.0).into_sale().unwrap();
        doc.prepend_sale(sale.clone());
        assert!(doc.first_duplicate_id().is_none());
        doc.prepend_sale(sale.clone());
        assert_eq!(doc.first_duplicate_id(), Some(("sale", sale.id)));
    }
}
