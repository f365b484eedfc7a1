//! Expense records and their form draft.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{lenient_amount, Identifiable, LedgerEntry, RecordDate};
use crate::errors::ValidationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    #[serde(rename = "data")]
    pub date: RecordDate,
    #[serde(rename = "descricao", default)]
    pub description: String,
    #[serde(rename = "categoria")]
    pub category: ExpenseCategory,
    #[serde(rename = "valor", deserialize_with = "lenient_amount", default)]
    pub value: f64,
    #[serde(rename = "tipo")]
    pub kind: ExpenseKind,
    #[serde(rename = "observacao", default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Identifiable for Expense {
    fn id(&self) -> &str {
        &self.id
    }
}

impl LedgerEntry for Expense {
    fn date(&self) -> &RecordDate {
        &self.date
    }

    fn amount(&self) -> f64 {
        self.value
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn category_label(&self) -> &'static str {
        self.category.label()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpenseCategory {
    Ingredientes,
    Embalagens,
    #[serde(rename = "Gás")]
    Gas,
    Energia,
    Aluguel,
    Transporte,
    Marketing,
    Outros,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 8] = [
        ExpenseCategory::Ingredientes,
        ExpenseCategory::Embalagens,
        ExpenseCategory::Gas,
        ExpenseCategory::Energia,
        ExpenseCategory::Aluguel,
        ExpenseCategory::Transporte,
        ExpenseCategory::Marketing,
        ExpenseCategory::Outros,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ExpenseCategory::Ingredientes => "Ingredientes",
            ExpenseCategory::Embalagens => "Embalagens",
            ExpenseCategory::Gas => "Gás",
            ExpenseCategory::Energia => "Energia",
            ExpenseCategory::Aluguel => "Aluguel",
            ExpenseCategory::Transporte => "Transporte",
            ExpenseCategory::Marketing => "Marketing",
            ExpenseCategory::Outros => "Outros",
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fixed costs recur every month, variable ones follow production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpenseKind {
    Fixa,
    #[serde(rename = "Variável")]
    Variavel,
}

impl ExpenseKind {
    pub const ALL: [ExpenseKind; 2] = [ExpenseKind::Fixa, ExpenseKind::Variavel];

    pub fn label(&self) -> &'static str {
        match self {
            ExpenseKind::Fixa => "Fixa",
            ExpenseKind::Variavel => "Variável",
        }
    }
}

impl fmt::Display for ExpenseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    pub date: RecordDate,
    pub description: String,
    pub category: ExpenseCategory,
    pub value: f64,
    pub kind: ExpenseKind,
    pub note: Option<String>,
}

impl ExpenseDraft {
    pub fn new(date: impl Into<RecordDate>, value: f64) -> Self {
        Self {
            date: date.into(),
            description: String::new(),
            category: ExpenseCategory::Ingredientes,
            value,
            kind: ExpenseKind::Variavel,
            note: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn category(mut self, category: ExpenseCategory) -> Self {
        self.category = category;
        self
    }

    pub fn kind(mut self, kind: ExpenseKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.date.validate()?;
        if !self.value.is_finite() || self.value <= 0.0 {
            return Err(ValidationError::NonPositiveValue { field: "value" });
        }
        Ok(())
    }

    pub fn into_expense(self) -> Result<Expense, ValidationError> {
        let id = Uuid::new_v4().to_string();
        self.into_expense_with_id(id)
    }

    pub(crate) fn into_expense_with_id(self, id: String) -> Result<Expense, ValidationError> {
        self.validate()?;
        Ok(Expense {
            id,
            date: self.date,
            description: self.description.trim().to_string(),
            category: self.category,
            value: self.value,
            kind: self.kind,
            note: self.note.filter(|note| !note.trim().is_empty()),
        })
    }
}

impl From<&Expense> for ExpenseDraft {
    fn from(expense: &Expense) -> Self {
        Self {
            date: expense.date.clone(),
            description: expense.description.clone(),
            category: expense.category,
            value: expense.value,
            kind: expense.kind,
            note: expense.note.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_requires_positive_value() {
        assert_eq!(
            ExpenseDraft::new("2024-03-05", -4.0).validate(),
            Err(ValidationError::NonPositiveValue { field: "value" })
        );
        assert!(ExpenseDraft::new("2024-03-05", 4.0).validate().is_ok());
    }

    #[test]
    fn accented_variants_round_trip() {
        let expense = ExpenseDraft::new("2024-03-05", 80.0)
            .category(ExpenseCategory::Gas)
            .kind(ExpenseKind::Fixa)
            .into_expense()
            .unwrap();
        let json = serde_json::to_value(&expense).unwrap();
        assert_eq!(json["categoria"], "Gás");
        assert_eq!(json["tipo"], "Fixa");
        assert_eq!(json["valor"], 80.0);

        let raw = r#"{"id":"x","data":"2024-03-06","descricao":"Farinha",
            "categoria":"Ingredientes","valor":12.5,"tipo":"Variável"}"#;
        let parsed: Expense = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.kind, ExpenseKind::Variavel);
        assert_eq!(parsed.category_label(), "Ingredientes");
    }
}
