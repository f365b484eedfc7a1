//! Validated lifecycle helpers for sales.

use tracing::debug;

use crate::core::services::{RecordQuery, ServiceError, ServiceResult};
use crate::domain::{FinancialDocument, Sale, SaleCategory, SaleDraft};
use crate::errors::ValidationError;

pub struct SaleService;

impl SaleService {
    /// Validates the draft, assigns a fresh id and prepends the sale.
    pub fn add(doc: &mut FinancialDocument, draft: SaleDraft) -> ServiceResult<String> {
        let sale = draft.into_sale()?;
        if doc.sale(&sale.id).is_some() {
            return Err(ValidationError::DuplicateId {
                kind: "sale",
                id: sale.id,
            }
            .into());
        }
        let id = sale.id.clone();
        doc.prepend_sale(sale);
        debug!(%id, "sale added");
        Ok(id)
    }

    /// Replaces the sale identified by `id` in place, keeping its position.
    pub fn update(doc: &mut FinancialDocument, id: &str, draft: SaleDraft) -> ServiceResult<()> {
        if doc.sale(id).is_none() {
            return Err(not_found(id));
        }
        let sale = draft.into_sale_with_id(id.to_string())?;
        doc.replace_sale(sale);
        debug!(%id, "sale updated");
        Ok(())
    }

    pub fn remove(doc: &mut FinancialDocument, id: &str) -> ServiceResult<Sale> {
        let removed = doc.remove_sale(id).ok_or_else(|| not_found(id))?;
        debug!(%id, "sale removed");
        Ok(removed)
    }

    pub fn find<'a>(doc: &'a FinancialDocument, id: &str) -> ServiceResult<&'a Sale> {
        doc.sale(id).ok_or_else(|| not_found(id))
    }

    /// Stored-order listing narrowed by `query`.
    pub fn filter<'a>(
        doc: &'a FinancialDocument,
        query: &RecordQuery<SaleCategory>,
    ) -> Vec<&'a Sale> {
        doc.sales
            .iter()
            .filter(|sale| query.matches(&sale.description, &sale.category))
            .collect()
    }
}

fn not_found(id: &str) -> ServiceError {
    ServiceError::NotFound {
        kind: "sale",
        id: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PaymentMethod;

    fn draft(description: &str, value: f64) -> SaleDraft {
        SaleDraft::new("2024-03-05", value).description(description)
    }

    #[test]
    fn add_prepends_new_sales() {
        let mut doc = FinancialDocument::default();
        let first = SaleService::add(&mut doc, draft("Bolo de pote", 15.0)).unwrap();
        let second = SaleService::add(&mut doc, draft("Coxinha", 6.0)).unwrap();
        assert_eq!(doc.sales[0].id, second);
        assert_eq!(doc.sales[1].id, first);
    }

    #[test]
    fn add_rejects_invalid_draft_without_touching_document() {
        let mut doc = FinancialDocument::default();
        let err = SaleService::add(&mut doc, draft("Grátis", 0.0)).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)), "{err:?}");
        assert!(doc.sales.is_empty());
    }

    #[test]
    fn update_keeps_id_and_position() {
        let mut doc = FinancialDocument::default();
        let target = SaleService::add(&mut doc, draft("Bolo", 80.0)).unwrap();
        SaleService::add(&mut doc, draft("Brigadeiro", 2.5)).unwrap();

        let edited = draft("Bolo de festa", 120.0).payment_method(PaymentMethod::Cartao);
        SaleService::update(&mut doc, &target, edited).unwrap();

        assert_eq!(doc.sales[1].id, target);
        assert_eq!(doc.sales[1].description, "Bolo de festa");
        assert_eq!(doc.sales[1].total_value, 120.0);
    }

    #[test]
    fn update_and_remove_fail_for_unknown_id() {
        let mut doc = FinancialDocument::default();
        let err = SaleService::update(&mut doc, "missing", draft("x", 1.0)).unwrap_err();
        assert!(
            matches!(err, ServiceError::NotFound { ref id, .. } if id == "missing"),
            "unexpected error: {err:?}"
        );
        assert!(SaleService::remove(&mut doc, "missing").is_err());
    }

    #[test]
    fn filter_by_search_and_category() {
        let mut doc = FinancialDocument::default();
        SaleService::add(&mut doc, draft("Bolo de Cenoura", 40.0)).unwrap();
        SaleService::add(
            &mut doc,
            draft("Cento de coxinhas", 90.0).category(SaleCategory::Salgados),
        )
        .unwrap();

        let query = RecordQuery::default().search("BOLO");
        assert_eq!(SaleService::filter(&doc, &query).len(), 1);

        let query = RecordQuery::default().category(SaleCategory::Salgados);
        let hits = SaleService::filter(&doc, &query);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].description, "Cento de coxinhas");

        assert_eq!(SaleService::filter(&doc, &RecordQuery::default()).len(), 2);
    }
}
