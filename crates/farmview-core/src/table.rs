//! Rendered table model.
//!
//! A [`Table`] is the transient projection of one successful response: the
//! column headings derived from the first record, one row of formatted cell
//! text per record, per-row visibility for search, and per-column sort state.
//! It is rebuilt from scratch on every fetch; nothing is merged.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

use crate::format::{NULL_PLACEHOLDER, format_column_name, format_value};
use crate::types::Record;

/// Hint attached to every sortable column heading.
pub const SORT_HINT: &str = "Click to sort";

/// Direction of a column sort.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

impl SortDirection {
    /// Returns the opposite direction.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// How a column's cells are compared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKind {
    /// By leading numeric value, thousands separators ignored.
    Numeric,
    /// By text, case-insensitive first.
    Text,
}

/// A table column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Column {
    /// Record key the column reads.
    pub key: String,
    /// Heading text.
    pub title: String,
}

impl Column {
    /// Creates a column for a record key with a formatted heading.
    #[must_use]
    pub fn from_key(key: impl Into<String>) -> Self {
        let key = key.into();
        let title = format_column_name(&key);
        Self { key, title }
    }
}

/// A body row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Row {
    /// Formatted cell text, one per column.
    pub cells: Vec<String>,
    /// Whether the row passes the current search.
    pub visible: bool,
}

impl Row {
    fn cell(&self, column: usize) -> &str {
        self.cells.get(column).map_or("", String::as_str)
    }
}

/// A rendered table with sortable columns and searchable rows.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Row>,
    /// Last direction applied per column index.
    sort_state: BTreeMap<usize, SortDirection>,
}

impl Table {
    /// Builds a table from records.
    ///
    /// Columns come from the keys of the first record; records are assumed to
    /// share that shape. A key missing from a later record shows the null
    /// placeholder.
    #[must_use]
    pub fn from_records(records: &[Record]) -> Self {
        let Some(first) = records.first() else {
            return Self::default();
        };

        let columns: Vec<Column> = first.keys().map(Column::from_key).collect();
        let rows = records
            .iter()
            .map(|record| Row {
                cells: columns
                    .iter()
                    .map(|column| {
                        record
                            .get(&column.key)
                            .map_or_else(|| NULL_PLACEHOLDER.to_string(), format_value)
                    })
                    .collect(),
                visible: true,
            })
            .collect();

        Self {
            columns,
            rows,
            sort_state: BTreeMap::new(),
        }
    }

    /// Returns the columns.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns all body rows in display order, hidden ones included.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Returns the rows that pass the current search.
    pub fn visible_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|row| row.visible)
    }

    /// Returns the number of body rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no body rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of rows that pass the current search.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.visible_rows().count()
    }

    /// Finds a column by key or heading, ignoring case.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| {
            c.key.eq_ignore_ascii_case(name) || c.title.eq_ignore_ascii_case(name)
        })
    }

    /// Returns the direction last applied to `column`, if it was sorted.
    #[must_use]
    pub fn sort_direction(&self, column: usize) -> Option<SortDirection> {
        self.sort_state.get(&column).copied()
    }

    /// Infers how `column` sorts from the first row's cell.
    ///
    /// The cell is numeric when, with `,` removed, its trimmed text is a
    /// finite number. Returns `None` when there are no rows or the column
    /// does not exist.
    #[must_use]
    pub fn sort_kind(&self, column: usize) -> Option<SortKind> {
        if column >= self.columns.len() {
            return None;
        }
        let first = self.rows.first()?;
        if is_numeric_text(&first.cell(column).replace(',', "")) {
            Some(SortKind::Numeric)
        } else {
            Some(SortKind::Text)
        }
    }

    /// Sorts the body rows by `column`, toggling that column's direction.
    ///
    /// The first sort of a column is ascending, the next descending, and so
    /// on; each column keeps its own state. The sort kind is decided once
    /// from the first row. All rows move, hidden ones included, and equal
    /// keys keep their relative order. Returns the applied direction, or
    /// `None` (and leaves the table untouched) when there is nothing to sort.
    pub fn sort_by_column(&mut self, column: usize) -> Option<SortDirection> {
        let kind = self.sort_kind(column)?;
        let direction = self
            .sort_direction(column)
            .map_or(SortDirection::Ascending, SortDirection::toggled);
        self.sort_state.insert(column, direction);

        self.rows.sort_by(|a, b| {
            let ordering = match kind {
                SortKind::Numeric => compare_numeric(a.cell(column), b.cell(column)),
                SortKind::Text => compare_text(a.cell(column), b.cell(column)),
            };
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });

        debug!(column, ?kind, ?direction, rows = self.rows.len(), "Sorted table");
        Some(direction)
    }

    /// Shows rows where any cell contains `query`, ignoring case, and hides
    /// the rest. Returns the number of visible rows.
    pub fn search(&mut self, query: &str) -> usize {
        let needle = query.to_uppercase();
        for row in &mut self.rows {
            row.visible = row
                .cells
                .iter()
                .any(|cell| cell.to_uppercase().contains(&needle));
        }
        let visible = self.visible_count();
        debug!(query, visible, total = self.rows.len(), "Filtered table");
        visible
    }
}

fn is_numeric_text(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty() && trimmed.parse::<f64>().is_ok_and(f64::is_finite)
}

/// Numeric value of the longest numeric prefix of `text`, or 0.
fn leading_number(text: &str) -> f64 {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;
    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return 0.0;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().unwrap_or(0.0)
}

fn compare_numeric(a: &str, b: &str) -> Ordering {
    let a = leading_number(&a.replace(',', ""));
    let b = leading_number(&b.replace(',', ""));
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellValue;

    fn table(rows: &[(&str, f64)]) -> Table {
        let records: Vec<Record> = rows
            .iter()
            .map(|(state, income)| Record::new().with("state", *state).with("net_income", *income))
            .collect();
        Table::from_records(&records)
    }

    fn column(table: &Table, index: usize) -> Vec<&str> {
        table.rows().iter().map(|r| r.cells[index].as_str()).collect()
    }

    #[test]
    fn test_columns_from_first_record() {
        let records = vec![Record::new().with("a", 1).with("b", "x")];
        let table = Table::from_records(&records);

        let titles: Vec<_> = table.columns().iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].cells, vec!["1", "x"]);
    }

    #[test]
    fn test_missing_key_renders_placeholder() {
        let records = vec![
            Record::new().with("a", 1).with("b", "x"),
            Record::new().with("a", 2),
        ];
        let table = Table::from_records(&records);
        assert_eq!(table.rows()[1].cells, vec!["2", "N/A"]);
    }

    #[test]
    fn test_empty_records() {
        let table = Table::from_records(&[]);
        assert!(table.is_empty());
        assert!(table.columns().is_empty());
    }

    #[test]
    fn test_numeric_sort_toggles() {
        let mut t = table(&[("OH", 1500.0), ("IA", 20.5), ("NE", 300.0)]);
        assert_eq!(t.sort_kind(1), Some(SortKind::Numeric));

        assert_eq!(t.sort_by_column(1), Some(SortDirection::Ascending));
        assert_eq!(column(&t, 1), vec!["20.5", "300", "1,500"]);

        assert_eq!(t.sort_by_column(1), Some(SortDirection::Descending));
        assert_eq!(column(&t, 1), vec!["1,500", "300", "20.5"]);

        assert_eq!(t.sort_by_column(1), Some(SortDirection::Ascending));
    }

    #[test]
    fn test_text_sort_is_lexicographic() {
        let mut t = table(&[("ohio", 1.0), ("Iowa", 2.0), ("Nebraska", 3.0)]);
        assert_eq!(t.sort_kind(0), Some(SortKind::Text));
        t.sort_by_column(0);
        assert_eq!(column(&t, 0), vec!["Iowa", "Nebraska", "ohio"]);
    }

    #[test]
    fn test_columns_keep_independent_state() {
        let mut t = table(&[("B", 2.0), ("A", 1.0)]);
        t.sort_by_column(0);
        assert_eq!(t.sort_by_column(1), Some(SortDirection::Ascending));
        assert_eq!(t.sort_direction(0), Some(SortDirection::Ascending));
        assert_eq!(t.sort_by_column(0), Some(SortDirection::Descending));
    }

    #[test]
    fn test_sort_kind_decided_by_first_row() {
        let records = vec![
            Record::new().with("v", "N/A"),
            Record::new().with("v", 10),
            Record::new().with("v", 9),
        ];
        let mut t = Table::from_records(&records);
        assert_eq!(t.sort_kind(0), Some(SortKind::Text));
        t.sort_by_column(0);
        // Text order: "10" < "9" < "N/A"
        assert_eq!(column(&t, 0), vec!["10", "9", "N/A"]);
    }

    #[test]
    fn test_numeric_sort_treats_unparsable_as_zero() {
        let records = vec![
            Record::new().with("v", 5),
            Record::new().with("v", CellValue::Null),
            Record::new().with("v", -3),
        ];
        let mut t = Table::from_records(&records);
        t.sort_by_column(0);
        assert_eq!(column(&t, 0), vec!["-3", "N/A", "5"]);
    }

    #[test]
    fn test_numeric_sort_with_mixed_later_rows() {
        let records = vec![
            Record::new().with("v", 1500),
            Record::new().with("v", "N/A"),
            Record::new().with("v", "12abc"),
            Record::new().with("v", 300),
        ];
        let mut t = Table::from_records(&records);
        assert_eq!(t.sort_kind(0), Some(SortKind::Numeric));

        t.sort_by_column(0);
        assert_eq!(column(&t, 0), vec!["N/A", "12abc", "300", "1,500"]);
        t.sort_by_column(0);
        assert_eq!(column(&t, 0), vec!["1,500", "300", "12abc", "N/A"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let mut t = table(&[("first", 1.0), ("second", 1.0), ("third", 0.0)]);
        t.sort_by_column(1);
        assert_eq!(column(&t, 0), vec!["third", "first", "second"]);
        t.sort_by_column(1);
        assert_eq!(column(&t, 0), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_sort_noop_cases() {
        let mut empty = Table::default();
        assert_eq!(empty.sort_by_column(0), None);

        let mut t = table(&[("OH", 1.0)]);
        assert_eq!(t.sort_by_column(7), None);
        assert_eq!(t.sort_direction(7), None);
    }

    #[test]
    fn test_search_case_insensitive() {
        let mut t = table(&[("OH", 1.0), ("Ohio Valley", 2.0), ("IA", 3.0)]);
        assert_eq!(t.search("oh"), 2);
        let visible: Vec<_> = t.visible_rows().map(|r| r.cells[0].as_str()).collect();
        assert_eq!(visible, vec!["OH", "Ohio Valley"]);

        assert_eq!(t.search(""), 3);
    }

    #[test]
    fn test_search_matches_formatted_text() {
        let mut t = table(&[("OH", 1234.5), ("IA", 99.0)]);
        assert_eq!(t.search("1,234"), 1);
    }

    #[test]
    fn test_sort_moves_hidden_rows() {
        let mut t = table(&[("OH", 3.0), ("IA", 1.0), ("OK", 2.0)]);
        t.search("O");
        t.sort_by_column(1);
        let all: Vec<_> = t.rows().iter().map(|r| (r.cells[0].as_str(), r.visible)).collect();
        assert_eq!(all, vec![("IA", false), ("OK", true), ("OH", true)]);
    }

    #[test]
    fn test_column_index() {
        let t = table(&[("OH", 1.0)]);
        assert_eq!(t.column_index("net_income"), Some(1));
        assert_eq!(t.column_index("Net Income"), Some(1));
        assert_eq!(t.column_index("STATE"), Some(0));
        assert_eq!(t.column_index("missing"), None);
    }

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number("12abc"), 12.0);
        assert_eq!(leading_number("  -3.5e2x"), -350.0);
        assert_eq!(leading_number(".5"), 0.5);
        assert_eq!(leading_number("N/A"), 0.0);
        assert_eq!(leading_number("-"), 0.0);
        assert_eq!(leading_number("7e"), 7.0);
    }

    #[test]
    fn test_is_numeric_text() {
        assert!(is_numeric_text("1234.5"));
        assert!(is_numeric_text(" 12 "));
        assert!(!is_numeric_text(""));
        assert!(!is_numeric_text("N/A"));
        assert!(!is_numeric_text("12abc"));
        assert!(!is_numeric_text("inf"));
    }
}
