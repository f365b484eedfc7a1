pub mod expense_service;
pub mod sale_service;
pub mod summary_service;
pub mod transfer_service;

pub use expense_service::ExpenseService;
pub use sale_service::SaleService;
pub use summary_service::{SummaryService, DEFAULT_RECENT_LIMIT};
pub use transfer_service::TransferService;

use crate::errors::ValidationError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{kind} `{id}` not found")]
    NotFound { kind: &'static str, id: String },
}

/// List-view filter: case-insensitive description search plus an optional
/// exact category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordQuery<C> {
    pub search: Option<String>,
    pub category: Option<C>,
}

impl<C> Default for RecordQuery<C> {
    fn default() -> Self {
        Self {
            search: None,
            category: None,
        }
    }
}

impl<C: PartialEq> RecordQuery<C> {
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn category(mut self, category: C) -> Self {
        self.category = Some(category);
        self
    }

    pub(crate) fn matches(&self, description: &str, category: &C) -> bool {
        let matches_search = match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => description
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            _ => true,
        };
        let matches_category = self
            .category
            .as_ref()
            .map_or(true, |wanted| wanted == category);
        matches_search && matches_category
    }
}
