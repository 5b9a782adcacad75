//! HTML fragments for the dashboard page.
//!
//! Element ids follow the page contract: `<id>-table`, `<id>-thead`,
//! `<id>-tbody`, `<id>-loading`, `<id>-error`, `<id>-results` and
//! `<id>-summary`. Headings carry `data-column` so a page script can call
//! back into the sort with the column index.

use farmview_core::Table;
use farmview_core::table::SORT_HINT;

use super::NO_DATA_MESSAGE;
use crate::view::SectionView;

/// Colspan of the empty-table placeholder row.
const PLACEHOLDER_COLSPAN: usize = 10;

/// Renders `table` with element ids prefixed by `id`.
#[must_use]
pub fn render_table(id: &str, table: &Table) -> String {
    let id = html_escape(id);
    let mut out = format!("<table id=\"{id}-table\" class=\"data-table\">\n");

    out.push_str(&format!("<thead id=\"{id}-thead\">\n"));
    if !table.columns().is_empty() {
        out.push_str("<tr>");
        for (index, column) in table.columns().iter().enumerate() {
            out.push_str(&format!(
                r#"<th data-column="{index}" title="{SORT_HINT}" style="cursor: pointer;">{}</th>"#,
                html_escape(&column.title)
            ));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</thead>\n");

    out.push_str(&format!("<tbody id=\"{id}-tbody\">\n"));
    if table.is_empty() {
        out.push_str(&format!(
            r#"<tr><td colspan="{PLACEHOLDER_COLSPAN}" class="text-center">{NO_DATA_MESSAGE}</td></tr>"#
        ));
        out.push('\n');
    }
    for row in table.rows() {
        if row.visible {
            out.push_str("<tr>");
        } else {
            out.push_str(r#"<tr style="display:none">"#);
        }
        for cell in &row.cells {
            out.push_str(&format!("<td>{}</td>", html_escape(cell)));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
    out
}

/// Renders a whole section: loading indicator, error slot, results and
/// summary.
#[must_use]
pub fn render_section(view: &SectionView) -> String {
    let id = view.section().id();
    let mut out = format!("<section id=\"{id}\">\n");

    out.push_str(&format!(
        r#"<div id="{id}-loading" class="loading"{}>Loading...</div>"#,
        hidden_unless(view.is_loading())
    ));
    out.push('\n');
    out.push_str(&format!(
        r#"<div id="{id}-error" class="error"{}>{}</div>"#,
        hidden_unless(view.error().is_some()),
        html_escape(view.error().unwrap_or_default())
    ));
    out.push('\n');

    out.push_str(&format!(
        r#"<div id="{id}-results"{}>"#,
        hidden_unless(view.results_visible())
    ));
    out.push('\n');
    match view.table() {
        Some(table) => out.push_str(&render_table(id, table)),
        None => out.push_str(&render_table(id, &Table::default())),
    }
    if let Some(summary) = view.summary() {
        out.push_str(&format!(
            r#"<div id="{id}-summary"><h4>Summary Statistics</h4><p>Total Records: {}</p></div>"#,
            summary.total_records
        ));
        out.push('\n');
    }
    out.push_str("</div>\n</section>\n");
    out
}

fn hidden_unless(visible: bool) -> &'static str {
    if visible { "" } else { r#" style="display:none""# }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::SectionId;
    use farmview_core::Record;

    #[test]
    fn test_render_table_ids_and_headings() {
        let table = Table::from_records(&[Record::new().with("net_income", 1234.5)]);
        let html = render_table("income", &table);

        assert!(html.contains(r#"<table id="income-table""#));
        assert!(html.contains(r#"<thead id="income-thead">"#));
        assert!(html.contains(r#"<tbody id="income-tbody">"#));
        assert!(html.contains(
            r#"<th data-column="0" title="Click to sort" style="cursor: pointer;">Net Income</th>"#
        ));
        assert!(html.contains("<td>1,234.5</td>"));
    }

    #[test]
    fn test_render_empty_placeholder() {
        let html = render_table("balance", &Table::default());
        assert!(html.contains(r#"<td colspan="10" class="text-center">No data available</td>"#));
        assert!(html.contains(r#"<thead id="balance-thead">"#));
        assert!(!html.contains("<th "));
    }

    #[test]
    fn test_render_escapes_cells() {
        let table = Table::from_records(&[Record::new().with("note", "<b>A&B</b>")]);
        let html = render_table("ratios", &table);
        assert!(html.contains("<td>&lt;b&gt;A&amp;B&lt;/b&gt;</td>"));
    }

    #[test]
    fn test_render_hidden_rows() {
        let mut table = Table::from_records(&[
            Record::new().with("state", "OH"),
            Record::new().with("state", "IA"),
        ]);
        table.search("oh");
        let html = render_table("structure", &table);
        assert!(html.contains("<tr><td>OH</td></tr>"));
        assert!(html.contains(r#"<tr style="display:none"><td>IA</td></tr>"#));
    }

    #[test]
    fn test_render_section_summary() {
        let mut view = SectionView::new(SectionId::Income);
        view.display_table(&[Record::new().with("a", 1), Record::new().with("a", 2)]);
        let html = render_section(&view);
        assert!(html.contains(r#"<div id="income-results">"#));
        assert!(html.contains("<p>Total Records: 2</p>"));
    }

    #[test]
    fn test_render_section_error() {
        let mut view = SectionView::new(SectionId::Compare);
        view.show_error("Please select a year");
        let html = render_section(&view);
        assert!(html.contains(r#"<div id="compare-error" class="error">Please select a year</div>"#));
        assert!(html.contains(r#"<div id="compare-results" style="display:none">"#));
        assert!(html.contains(r#"<div id="compare-loading" class="loading" style="display:none">"#));
    }
}
