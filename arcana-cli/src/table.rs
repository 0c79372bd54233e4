//! Plain-text table rendering for command output.

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone)]
pub(crate) struct Column {
    pub header: &'static str,
    pub align: Align,
    /// Cells longer than this are truncated with "...".
    pub max_width: Option<usize>,
}

impl Column {
    pub(crate) fn left(header: &'static str) -> Self {
        Self {
            header,
            align: Align::Left,
            max_width: None,
        }
    }

    pub(crate) fn right(header: &'static str) -> Self {
        Self {
            header,
            align: Align::Right,
            max_width: None,
        }
    }

    pub(crate) fn max(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }
}

/// A table of text cells, rendered with space-padded columns.
#[derive(Debug, Clone)]
pub(crate) struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub(crate) fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub(crate) fn add_row(&mut self, cells: Vec<String>) {
        let cells = cells
            .into_iter()
            .zip(&self.columns)
            .map(|(cell, col)| match col.max_width {
                Some(max) => truncate_str(&cell, max),
                None => cell,
            })
            .collect();
        self.rows.push(cells);
    }

    fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(col.header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    /// Render the header, a rule, and every row.
    pub(crate) fn render(&self) -> Vec<String> {
        let widths = self.widths();
        let mut lines = Vec::with_capacity(self.rows.len() + 2);

        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(col, &w)| pad(col.header, w, col.align))
            .collect();
        lines.push(
            header
                .join("  ")
                .trim_end()
                .if_supports_color(Stdout, |t| t.bold())
                .to_string(),
        );

        let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
        lines.push(rule.join("  "));

        for row in &self.rows {
            let cells: Vec<String> = self
                .columns
                .iter()
                .zip(&widths)
                .enumerate()
                .map(|(i, (col, &w))| pad(row.get(i).map(String::as_str).unwrap_or(""), w, col.align))
                .collect();
            lines.push(cells.join("  ").trim_end().to_string());
        }
        lines
    }

    /// Render through the logger at info level.
    pub(crate) fn log(&self) {
        for line in self.render() {
            log::info!("{}", line);
        }
    }
}

fn pad(cell: &str, width: usize, align: Align) -> String {
    match align {
        Align::Left => format!("{cell:<width$}"),
        Align::Right => format!("{cell:>width$}"),
    }
}

/// Truncate a string to a maximum width in characters, appending "..." if needed.
pub(crate) fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max > 3 {
        let kept: String = s.chars().take(max - 3).collect();
        format!("{kept}...")
    } else {
        s.chars().take(max).collect()
    }
}
