/// Column alignment inside a [`Table`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// A plain-text table rendered inside a Discord code block
pub struct Table {
    headers: Vec<String>,
    aligns: Vec<Align>,
    rows: Vec<Vec<String>>,
    col_widths: Vec<usize>,
}

impl Table {
    /// Create a table; every column starts left aligned
    pub fn new(headers: &[&str]) -> Self {
        Table {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            aligns: vec![Align::Left; headers.len()],
            rows: Vec::new(),
            col_widths: headers.iter().map(|h| h.chars().count()).collect(),
        }
    }

    pub fn align(mut self, column: usize, align: Align) -> Self {
        if let Some(slot) = self.aligns.get_mut(column) {
            *slot = align;
        }
        self
    }

    /// Add a row; cells beyond the header count are ignored
    pub fn add_row(&mut self, row: Vec<String>) {
        for (width, cell) in self.col_widths.iter_mut().zip(&row) {
            *width = (*width).max(cell.chars().count());
        }
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let mut output = String::from("```\n");
        output.push_str(&self.render_row(&self.headers));
        output.push('\n');
        output.push_str(&self.render_separator());
        output.push('\n');
        for row in &self.rows {
            output.push_str(&self.render_row(row));
            output.push('\n');
        }
        output.push_str("```");
        output
    }

    fn render_row(&self, row: &[String]) -> String {
        let cells: Vec<String> = self
            .col_widths
            .iter()
            .zip(&self.aligns)
            .enumerate()
            .map(|(i, (&width, align))| {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                match align {
                    Align::Left => format!("{:<width$}", cell, width = width),
                    Align::Right => format!("{:>width$}", cell, width = width),
                }
            })
            .collect();
        cells.join(" | ").trim_end().to_string()
    }

    fn render_separator(&self) -> String {
        self.col_widths
            .iter()
            .map(|&width| "-".repeat(width))
            .collect::<Vec<_>>()
            .join("-+-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rates_table() {
        let mut table = Table::new(&["Code", "Rate"]).align(1, Align::Right);
        table.add_row(vec!["JPY".to_string(), "130.2".to_string()]);
        table.add_row(vec!["USD".to_string(), "1.1".to_string()]);

        let rendered = table.render();
        assert!(rendered.starts_with("```\nCode |  Rate\n"));
        assert!(rendered.contains("-----+------"));
        assert!(rendered.contains("JPY  | 130.2"));
        assert!(rendered.contains("USD  |   1.1"));
        assert!(rendered.ends_with("```"));
    }

    #[test]
    fn test_is_empty() {
        let mut table = Table::new(&["Code"]);
        assert!(table.is_empty());
        table.add_row(vec!["USD".to_string()]);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_short_row_padded() {
        let mut table = Table::new(&["A", "B"]);
        table.add_row(vec!["x".to_string()]);
        assert!(table.render().contains("\nx |\n"));
    }
}
