//! Fixed-width plain-text tables for the printable report.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableColumn {
    pub header: String,
    pub min_width: usize,
    pub max_width: Option<usize>,
    pub alignment: Alignment,
}

impl TableColumn {
    pub fn new(header: impl Into<String>, alignment: Alignment) -> Self {
        Self {
            header: header.into(),
            min_width: 0,
            max_width: None,
            alignment,
        }
    }

    pub fn max_width(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }
}

pub struct Table {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
    pub padding: usize,
}

impl Table {
    pub fn new(columns: Vec<TableColumn>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            padding: 1,
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Content width per column from headers, every row and the column limits.
    pub fn compute_widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let mut width = visible_width(&column.header).max(column.min_width);
                for row in &self.rows {
                    if let Some(cell) = row.get(idx) {
                        width = width.max(visible_width(cell));
                    }
                }
                if let Some(max_width) = column.max_width {
                    width = width.min(max_width);
                }
                width
            })
            .collect()
    }

    /// Header line followed by a rule of matching width.
    pub fn header_lines(&self, widths: &[usize]) -> [String; 2] {
        let header: Vec<String> = self.columns.iter().map(|c| c.header.clone()).collect();
        [
            self.render_row(&header, widths),
            horizontal_rule(widths, self.padding),
        ]
    }

    pub fn render_row(&self, row: &[String], widths: &[usize]) -> String {
        let cells: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let text = row.get(idx).map(String::as_str).unwrap_or("");
                render_cell(text, widths[idx], column.alignment, self.padding)
            })
            .collect();
        cells.join("|").trim_end().to_string()
    }

    pub fn render(&self) -> Vec<String> {
        let widths = self.compute_widths();
        let mut lines: Vec<String> = self.header_lines(&widths).into();
        lines.extend(self.rows.iter().map(|row| self.render_row(row, &widths)));
        lines
    }
}

fn visible_width(text: &str) -> usize {
    text.chars().count()
}

fn truncate_text(text: &str, width: usize) -> String {
    if visible_width(text) <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut fitted: String = text.chars().take(width - 1).collect();
    fitted.push('…');
    fitted
}

pub fn render_cell(text: &str, width: usize, alignment: Alignment, padding: usize) -> String {
    let fitted = truncate_text(text, width);
    let remaining = width.saturating_sub(visible_width(&fitted));
    let (left, right) = match alignment {
        Alignment::Left => (0, remaining),
        Alignment::Right => (remaining, 0),
    };
    format!(
        "{pad}{}{fitted}{}{pad}",
        " ".repeat(left),
        " ".repeat(right),
        pad = " ".repeat(padding)
    )
}

pub fn horizontal_rule(widths: &[usize], padding: usize) -> String {
    widths
        .iter()
        .map(|width| "-".repeat(width + padding * 2))
        .collect::<Vec<_>>()
        .join("+")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_respect_content_and_limits() {
        let mut table = Table::new(vec![
            TableColumn::new("Mês", Alignment::Left),
            TableColumn::new("Descrição", Alignment::Left).max_width(5),
        ]);
        table.push_row(vec!["2024-03".into(), "Bolo de chocolate".into()]);
        assert_eq!(table.compute_widths(), vec![7, 5]);
    }

    #[test]
    fn right_alignment_pads_on_the_left() {
        assert_eq!(render_cell("10", 5, Alignment::Right, 1), "    10 ");
        assert_eq!(render_cell("abcdef", 4, Alignment::Left, 0), "abc…");
    }

    #[test]
    fn render_includes_header_rule_and_rows() {
        let mut table = Table::new(vec![
            TableColumn::new("A", Alignment::Left),
            TableColumn::new("B", Alignment::Right),
        ]);
        table.push_row(vec!["x".into(), "1".into()]);
        let lines = table.render();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], " A | B");
        assert_eq!(lines[1], "---+---");
        assert_eq!(lines[2], " x | 1");
    }
}
