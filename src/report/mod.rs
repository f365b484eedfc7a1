//! Printable report: month summary plus the full transaction listing,
//! paginated as plain text.

pub mod table;

use chrono::NaiveDate;

use crate::core::services::SummaryService;
use crate::currency::{format_currency, format_date, format_record_date};
use crate::domain::{FinancialDocument, MonthTotals, MonthlyHistoryRow, TransactionKind};
use crate::utils::build_info;

use self::table::{Alignment, Table, TableColumn};

pub const REPORT_TITLE: &str = "Relatório Financeiro - Delícias das Maria's";
pub const PAGE_BREAK: char = '\x0c';
const DESCRIPTION_MAX_WIDTH: usize = 40;

/// One line of the detail listing, already detached from the document.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLine {
    pub date: String,
    pub description: String,
    pub category: &'static str,
    pub kind: TransactionKind,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyReport {
    pub generated_on: NaiveDate,
    pub months: Vec<MonthlyHistoryRow>,
    pub totals: MonthTotals,
    pub lines: Vec<ReportLine>,
}

impl MonthlyReport {
    pub fn build(doc: &FinancialDocument, generated_on: NaiveDate) -> Self {
        let months = SummaryService::monthly_history(doc);
        let totals = SummaryService::history_totals(&months);
        let lines = SummaryService::all_transactions(doc)
            .into_iter()
            .map(|entry| ReportLine {
                date: format_record_date(entry.date()),
                description: entry.description().to_string(),
                category: entry.category_label(),
                kind: entry.kind(),
                amount: entry.signed_amount(),
            })
            .collect();
        Self {
            generated_on,
            months,
            totals,
            lines,
        }
    }

    pub fn page_count(&self, rows_per_page: usize) -> usize {
        let rows_per_page = rows_per_page.max(1);
        self.lines.len().div_ceil(rows_per_page).max(1)
    }

    /// Renders every page; pages are separated by a form feed and each one
    /// ends with its `Página N de M` footer.
    pub fn render(&self, rows_per_page: usize) -> String {
        let rows_per_page = rows_per_page.max(1);
        let total_pages = self.page_count(rows_per_page);

        let detail = self.detail_table();
        let widths = detail.compute_widths();
        let mut chunks = detail.rows.chunks(rows_per_page);

        let mut pages = Vec::with_capacity(total_pages);
        for number in 1..=total_pages {
            let mut page = Vec::new();
            if number == 1 {
                page.push(REPORT_TITLE.to_string());
                page.push(format!(
                    "Gerado em {} - doce_gestao {}",
                    format_date(self.generated_on),
                    build_info::current().short_label()
                ));
                page.push(String::new());
                page.push("Resumo mensal".to_string());
                page.extend(self.summary_table().render());
                page.push(String::new());
                page.push("Transações".to_string());
            } else {
                page.push("Transações (continuação)".to_string());
            }

            match chunks.next() {
                Some(rows) => {
                    page.extend(detail.header_lines(&widths));
                    page.extend(rows.iter().map(|row| detail.render_row(row, &widths)));
                }
                None => page.push("Nenhuma transação registrada.".to_string()),
            }

            page.push(String::new());
            page.push(format!("Página {number} de {total_pages}"));
            pages.push(page.join("\n"));
        }

        pages.join(&format!("\n{PAGE_BREAK}"))
    }

    fn summary_table(&self) -> Table {
        let mut table = Table::new(vec![
            TableColumn::new("Mês", Alignment::Left),
            TableColumn::new("Receitas", Alignment::Right),
            TableColumn::new("Despesas", Alignment::Right),
            TableColumn::new("Lucro", Alignment::Right),
        ]);
        for row in &self.months {
            let month = row
                .month_key()
                .map(|key| key.label_pt())
                .unwrap_or_else(|| row.month.clone());
            table.push_row(vec![
                month,
                format_currency(row.revenue),
                format_currency(row.expense),
                format_currency(row.profit),
            ]);
        }
        table.push_row(vec![
            "TOTAL".to_string(),
            format_currency(self.totals.revenue),
            format_currency(self.totals.cost),
            format_currency(self.totals.profit),
        ]);
        table
    }

    fn detail_table(&self) -> Table {
        let mut table = Table::new(vec![
            TableColumn::new("Data", Alignment::Left),
            TableColumn::new("Descrição", Alignment::Left).max_width(DESCRIPTION_MAX_WIDTH),
            TableColumn::new("Categoria", Alignment::Left),
            TableColumn::new("Tipo", Alignment::Left),
            TableColumn::new("Valor", Alignment::Right),
        ]);
        for line in &self.lines {
            table.push_row(vec![
                line.date.clone(),
                line.description.clone(),
                line.category.to_string(),
                line.kind.label().to_string(),
                format_currency(line.amount),
            ]);
        }
        table
    }
}
