/// Box-drawn table with per-column widths sized to the content.
pub struct TableFormatter {
    headers: Vec<&'static str>,
    widths: Vec<usize>,
}

impl TableFormatter {
    /// `max_widths[i]` caps column `i`; longer cells are truncated.
    pub fn new(headers: &[&'static str], max_widths: &[usize], rows: &[Vec<String>]) -> Self {
        let widths = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let content = rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or(0);
                let cap = max_widths.get(i).copied().unwrap_or(40);
                content.max(header.chars().count()).min(cap.max(header.len()))
            })
            .collect();

        Self {
            headers: headers.to_vec(),
            widths,
        }
    }

    pub fn render(&self, rows: &[Vec<String>]) -> String {
        let mut lines = vec![
            self.border('┌', '┬', '┐'),
            self.row(self.headers.iter().map(|h| h.to_string())),
            self.border('├', '┼', '┤'),
        ];
        for row in rows {
            lines.push(self.row(row.iter().cloned()));
        }
        lines.push(self.border('└', '┴', '┘'));
        lines.join("\n")
    }

    pub fn print_table(&self, rows: &[Vec<String>]) {
        println!("{}", self.render(rows));
    }

    fn row(&self, cells: impl Iterator<Item = String>) -> String {
        let cells: Vec<String> = cells
            .zip(&self.widths)
            .map(|(cell, width)| format!(" {} ", truncate(&cell, *width)))
            .collect();
        format!("│{}│", cells.join("│"))
    }

    fn border(&self, left: char, middle: char, right: char) -> String {
        let segments: Vec<String> = self.widths.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{}{}{}", left, segments.join(&middle.to_string()), right)
    }
}

/// Truncate a string to a maximum display width, adding "..." if truncated.
///
/// Uses character count (not byte count) to safely handle UTF-8 strings.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        format!("{:<width$}", s, width = max_len)
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", truncated), width = max_len)
    }
}
