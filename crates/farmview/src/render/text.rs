//! Grid tables for terminals.

use farmview_core::{SortKind, Table};

use super::NO_DATA_MESSAGE;
use crate::view::SectionView;

/// Renders the visible rows of `table` as a grid.
///
/// ```text
/// +-------+------------+
/// | State | Net Income |
/// +=======+============+
/// | OH    |      1,500 |
/// +-------+------------+
/// ```
///
/// Numeric columns are right-aligned. An empty table renders as
/// `No data available`.
#[must_use]
pub fn render_table(table: &Table) -> String {
    let columns = table.columns();
    if columns.is_empty() || table.is_empty() {
        return format!("{NO_DATA_MESSAGE}\n");
    }

    let mut widths: Vec<usize> = columns.iter().map(|c| c.title.chars().count()).collect();
    for row in table.visible_rows() {
        for (width, cell) in widths.iter_mut().zip(&row.cells) {
            *width = (*width).max(cell.chars().count());
        }
    }
    let right: Vec<bool> = (0..columns.len())
        .map(|i| table.sort_kind(i) == Some(SortKind::Numeric))
        .collect();

    let mut out = String::new();
    push_rule(&mut out, &widths, '-');
    let headings: Vec<&str> = columns.iter().map(|c| c.title.as_str()).collect();
    push_line(&mut out, &headings, &widths, &vec![false; widths.len()]);
    push_rule(&mut out, &widths, '=');
    for row in table.visible_rows() {
        let cells: Vec<&str> = row.cells.iter().map(String::as_str).collect();
        push_line(&mut out, &cells, &widths, &right);
        push_rule(&mut out, &widths, '-');
    }
    out
}

fn push_rule(out: &mut String, widths: &[usize], fill: char) {
    out.push('+');
    for width in widths {
        out.extend(std::iter::repeat_n(fill, width + 2));
        out.push('+');
    }
    out.push('\n');
}

fn push_line(out: &mut String, cells: &[&str], widths: &[usize], right: &[bool]) {
    out.push('|');
    for (i, &width) in widths.iter().enumerate() {
        let cell = cells.get(i).copied().unwrap_or("");
        let padded = if right.get(i).copied().unwrap_or(false) {
            format!(" {cell:>width$} ")
        } else {
            format!(" {cell:<width$} ")
        };
        out.push_str(&padded);
        out.push('|');
    }
    out.push('\n');
}

/// Renders a section: error, table and summary.
#[must_use]
pub fn render_section(view: &SectionView) -> String {
    let mut out = String::new();
    if let Some(error) = view.error() {
        out.push_str("Error: ");
        out.push_str(error);
        out.push('\n');
    }
    if !view.results_visible() {
        return out;
    }
    if let Some(table) = view.table() {
        out.push_str(&render_table(table));
        if table.visible_count() < table.len() {
            out.push_str(&format!(
                "Showing {} of {} rows\n",
                table.visible_count(),
                table.len()
            ));
        }
    }
    if let Some(summary) = view.summary() {
        out.push_str("\nSummary Statistics\n");
        out.push_str(&format!("Total Records: {}\n", summary.total_records));
    }
    out
}
