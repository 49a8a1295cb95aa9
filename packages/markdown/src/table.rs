//! Grouping of consecutive pipe-delimited lines into tables.

use std::sync::LazyLock;

use ctfboard_markdown_models::{Alignment, InlineRun, Table};
use regex::Regex;

static SEPARATOR_CELL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^:?-+:?$").unwrap());

/// Splits a line on unescaped `|`.
///
/// Returns `None` unless the split yields more than two parts. Empty outer
/// parts from leading/trailing pipes are dropped and cells are trimmed.
#[must_use]
pub fn split_table_line(line: &str) -> Option<Vec<&str>> {
    let bytes = line.as_bytes();
    let mut parts = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'|' => {
                parts.push(&line[start..i]);
                start = i + 1;
                i += 1;
            }
            _ => i += 1,
        }
    }
    parts.push(&line[start.min(line.len())..]);

    if parts.len() <= 2 {
        return None;
    }

    if parts.first().is_some_and(|p| p.trim().is_empty()) {
        parts.remove(0);
    }
    if parts.last().is_some_and(|p| p.trim().is_empty()) {
        parts.pop();
    }

    Some(parts.into_iter().map(str::trim).collect())
}

/// Returns per-column alignment if every cell is a `:?-+:?` separator.
#[must_use]
pub fn parse_separator(cells: &[&str]) -> Option<Vec<Alignment>> {
    if cells.is_empty() || !cells.iter().all(|c| SEPARATOR_CELL.is_match(c)) {
        return None;
    }

    Some(
        cells
            .iter()
            .map(|cell| match (cell.starts_with(':'), cell.ends_with(':')) {
                (true, true) => Alignment::Center,
                (false, true) => Alignment::Right,
                (true, false) => Alignment::Left,
                (false, false) => Alignment::None,
            })
            .collect(),
    )
}

/// Table grouping state.
#[derive(Debug, Default)]
pub enum TableState {
    #[default]
    Idle,
    /// A separator arrived before any header row.
    AwaitingHeader,
    /// Header row seen; a separator here sets the column alignment.
    AfterHeader(Table),
    Body(Table),
}

impl TableState {
    /// Adds a non-separator row. The first one becomes the header.
    pub fn row(&mut self, cells: Vec<InlineRun>) {
        *self = match std::mem::take(self) {
            Self::Idle | Self::AwaitingHeader => Self::AfterHeader(Table {
                alignments: vec![Alignment::None; cells.len()],
                header: cells,
                rows: Vec::new(),
            }),
            Self::AfterHeader(mut table) | Self::Body(mut table) => {
                let width = table.header.len();
                let mut cells = cells;
                cells.resize_with(width, Vec::new);
                table.rows.push(cells);
                Self::Body(table)
            }
        };
    }

    /// Consumes a separator row; it never produces a row of its own.
    pub fn separator(&mut self, alignments: Vec<Alignment>) {
        *self = match std::mem::take(self) {
            Self::Idle | Self::AwaitingHeader => Self::AwaitingHeader,
            Self::AfterHeader(mut table) => {
                let mut alignments = alignments;
                alignments.resize(table.header.len(), Alignment::None);
                table.alignments = alignments;
                Self::Body(table)
            }
            body @ Self::Body(_) => body,
        };
    }

    /// Flushes the open table, if it has a header.
    pub fn close(&mut self) -> Option<Table> {
        match std::mem::take(self) {
            Self::AfterHeader(table) | Self::Body(table) => Some(table),
            Self::Idle | Self::AwaitingHeader => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use ctfboard_markdown_models::Inline;

    use super::*;

    fn cells(values: &[&str]) -> Vec<InlineRun> {
        values.iter().map(|v| vec![Inline::text(*v)]).collect()
    }

    #[test]
    fn test_split_with_outer_pipes() {
        assert_eq!(
            split_table_line("| 이름 | 점수 |"),
            Some(vec!["이름", "점수"])
        );
    }

    #[test]
    fn test_split_without_outer_pipes() {
        assert_eq!(split_table_line("a | b | c"), Some(vec!["a", "b", "c"]));
    }

    #[test]
    fn test_two_parts_is_not_a_table_line() {
        assert_eq!(split_table_line("a | b"), None);
        assert_eq!(split_table_line("no pipes"), None);
    }

    #[test]
    fn test_escaped_pipes_do_not_split() {
        assert_eq!(split_table_line(r"a \| b \| c"), None);
        assert_eq!(
            split_table_line(r"| a \| b | c |"),
            Some(vec![r"a \| b", "c"])
        );
    }

    #[test]
    fn test_separator_alignment() {
        assert_eq!(
            parse_separator(&["---", ":--", "--:", ":-:"]),
            Some(vec![
                Alignment::None,
                Alignment::Left,
                Alignment::Right,
                Alignment::Center,
            ])
        );
        assert_eq!(parse_separator(&["---", "abc"]), None);
        assert_eq!(parse_separator(&[""]), None);
    }

    #[test]
    fn test_header_separator_body() {
        let mut state = TableState::default();
        state.row(cells(&["h1", "h2"]));
        state.separator(vec![Alignment::None, Alignment::Right]);
        state.row(cells(&["a", "b"]));

        let table = state.close().unwrap();
        assert_eq!(table.header.len(), 2);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.alignments, vec![Alignment::None, Alignment::Right]);
        assert!(matches!(state, TableState::Idle));
    }

    #[test]
    fn test_rows_without_separator() {
        let mut state = TableState::default();
        state.row(cells(&["h"]));
        state.row(cells(&["1"]));
        state.row(cells(&["2"]));

        let table = state.close().unwrap();
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn test_rows_are_padded_and_truncated_to_header_width() {
        let mut state = TableState::default();
        state.row(cells(&["a", "b", "c"]));
        state.row(cells(&["1"]));
        state.row(cells(&["1", "2", "3", "4"]));

        let table = state.close().unwrap();
        assert!(table.rows.iter().all(|row| row.len() == 3));
        assert!(table.rows[0][2].is_empty());
    }

    #[test]
    fn test_separator_only_produces_nothing() {
        let mut state = TableState::default();
        state.separator(vec![Alignment::None]);
        assert!(matches!(state, TableState::AwaitingHeader));
        assert!(state.close().is_none());
    }

    #[test]
    fn test_separator_before_header_is_skipped() {
        let mut state = TableState::default();
        state.separator(vec![Alignment::None]);
        state.row(cells(&["header"]));
        state.row(cells(&["body"]));

        let table = state.close().unwrap();
        assert_eq!(table.header, cells(&["header"]));
        assert_eq!(table.rows.len(), 1);
    }
}
