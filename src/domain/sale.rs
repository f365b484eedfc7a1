//! Sale records and the form draft used to create or edit them.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{
    lenient_amount, lenient_quantity, Identifiable, LedgerEntry, RecordDate,
};
use crate::errors::ValidationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: String,
    #[serde(rename = "data")]
    pub date: RecordDate,
    #[serde(rename = "descricao", default)]
    pub description: String,
    #[serde(rename = "categoria")]
    pub category: SaleCategory,
    #[serde(rename = "quantidade", deserialize_with = "lenient_quantity", default)]
    pub quantity: u32,
    #[serde(rename = "valorTotal", deserialize_with = "lenient_amount", default)]
    pub total_value: f64,
    #[serde(rename = "formaPagamento")]
    pub payment_method: PaymentMethod,
    #[serde(rename = "observacao", default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Identifiable for Sale {
    fn id(&self) -> &str {
        &self.id
    }
}

impl LedgerEntry for Sale {
    fn date(&self) -> &RecordDate {
        &self.date
    }

    fn amount(&self) -> f64 {
        self.total_value
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn category_label(&self) -> &'static str {
        self.category.label()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SaleCategory {
    Bolo,
    Docinhos,
    Salgados,
    Encomenda,
    Outros,
}

impl SaleCategory {
    pub const ALL: [SaleCategory; 5] = [
        SaleCategory::Bolo,
        SaleCategory::Docinhos,
        SaleCategory::Salgados,
        SaleCategory::Encomenda,
        SaleCategory::Outros,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SaleCategory::Bolo => "Bolo",
            SaleCategory::Docinhos => "Docinhos",
            SaleCategory::Salgados => "Salgados",
            SaleCategory::Encomenda => "Encomenda",
            SaleCategory::Outros => "Outros",
        }
    }
}

impl fmt::Display for SaleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    Pix,
    #[serde(rename = "Cartão")]
    Cartao,
    Dinheiro,
    Outro,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Pix,
        PaymentMethod::Cartao,
        PaymentMethod::Dinheiro,
        PaymentMethod::Outro,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Pix => "Pix",
            PaymentMethod::Cartao => "Cartão",
            PaymentMethod::Dinheiro => "Dinheiro",
            PaymentMethod::Outro => "Outro",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unvalidated sale input coming from a form.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleDraft {
    pub date: RecordDate,
    pub description: String,
    pub category: SaleCategory,
    pub quantity: u32,
    pub total_value: f64,
    pub payment_method: PaymentMethod,
    pub note: Option<String>,
}

impl SaleDraft {
    pub fn new(date: impl Into<RecordDate>, total_value: f64) -> Self {
        Self {
            date: date.into(),
            description: String::new(),
            category: SaleCategory::Bolo,
            quantity: 1,
            total_value,
            payment_method: PaymentMethod::Pix,
            note: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn category(mut self, category: SaleCategory) -> Self {
        self.category = category;
        self
    }

    pub fn quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = method;
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.date.validate()?;
        if !self.total_value.is_finite() || self.total_value <= 0.0 {
            return Err(ValidationError::NonPositiveValue {
                field: "total value",
            });
        }
        if self.quantity == 0 {
            return Err(ValidationError::ZeroQuantity);
        }
        Ok(())
    }

    /// Validates and stamps a fresh id.
    pub fn into_sale(self) -> Result<Sale, ValidationError> {
        let id = Uuid::new_v4().to_string();
        self.into_sale_with_id(id)
    }

    pub(crate) fn into_sale_with_id(self, id: String) -> Result<Sale, ValidationError> {
        self.validate()?;
        Ok(Sale {
            id,
            date: self.date,
            description: self.description.trim().to_string(),
            category: self.category,
            quantity: self.quantity,
            total_value: self.total_value,
            payment_method: self.payment_method,
            note: self.note.filter(|note| !note.trim().is_empty()),
        })
    }
}

impl From<&Sale> for SaleDraft {
    fn from(sale: &Sale) -> Self {
        Self {
            date: sale.date.clone(),
            description: sale.description.clone(),
            category: sale.category,
            quantity: sale.quantity,
            total_value: sale.total_value,
            payment_method: sale.payment_method,
            note: sale.note.clone(),
        }
    }
}
