//! Per-section view state and filter controls.
//!
//! Every dashboard section owns a [`SectionView`] (loading flag, error slot,
//! results visibility, rendered table, summary). Report sections also own
//! [`ReportControls`]; the comparison section owns [`CompareControls`].

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

use farmview_core::report::DEFAULT_COMPARE_REPORT;
use farmview_core::{
    ComparisonKind, FilterSelection, Record, ReportKind, SelectOption, SortDirection, Table, Year,
};

/// One of the five dashboard sections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionId {
    /// Farm business income statement.
    Income,
    /// Farm business balance sheet.
    Balance,
    /// Farm business financial ratios.
    Ratios,
    /// Structural characteristics.
    Structure,
    /// Cross-group comparison.
    Compare,
}

impl SectionId {
    /// All sections in page order.
    pub const ALL: [Self; 5] = [
        Self::Income,
        Self::Balance,
        Self::Ratios,
        Self::Structure,
        Self::Compare,
    ];

    /// Element id prefix of this section (`income`, `balance`, ...).
    #[must_use]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Balance => "balance",
            Self::Ratios => "ratios",
            Self::Structure => "structure",
            Self::Compare => "compare",
        }
    }

    /// Report fetched by this section, or `None` for the comparison.
    #[must_use]
    pub const fn report_kind(&self) -> Option<ReportKind> {
        match self {
            Self::Income => Some(ReportKind::IncomeStatement),
            Self::Balance => Some(ReportKind::BalanceSheet),
            Self::Ratios => Some(ReportKind::FinancialRatios),
            Self::Structure => Some(ReportKind::StructuralCharacteristics),
            Self::Compare => None,
        }
    }

    /// Section that renders `kind`, if the dashboard has one.
    #[must_use]
    pub const fn for_report(kind: ReportKind) -> Option<Self> {
        match kind {
            ReportKind::IncomeStatement => Some(Self::Income),
            ReportKind::BalanceSheet => Some(Self::Balance),
            ReportKind::FinancialRatios => Some(Self::Ratios),
            ReportKind::StructuralCharacteristics => Some(Self::Structure),
            ReportKind::GovernmentPayments | ReportKind::OperatorHouseholdIncome => None,
        }
    }

    /// Whether this section shows summary statistics after rendering.
    #[must_use]
    pub const fn shows_summary(&self) -> bool {
        matches!(self, Self::Income)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Summary statistics shown under a rendered table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Number of records in the response.
    pub total_records: usize,
}

/// View state of one section.
///
/// Replaces the page elements `<id>-loading`, `<id>-error`, `<id>-results`,
/// `<id>-thead`/`<id>-tbody` and `<id>-summary`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SectionView {
    section: SectionId,
    loading: bool,
    error: Option<String>,
    results_visible: bool,
    table: Option<Table>,
    summary: Option<Summary>,
}

impl SectionView {
    /// Creates the initial state: idle, no error, results hidden.
    #[must_use]
    pub const fn new(section: SectionId) -> Self {
        Self {
            section,
            loading: false,
            error: None,
            results_visible: false,
            table: None,
            summary: None,
        }
    }

    /// Returns the section this view belongs to.
    #[must_use]
    pub const fn section(&self) -> SectionId {
        self.section
    }

    /// Returns true while a request is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Returns the visible error message.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns true once a table has been rendered.
    #[must_use]
    pub const fn results_visible(&self) -> bool {
        self.results_visible
    }

    /// Returns the rendered table.
    #[must_use]
    pub const fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    /// Returns the rendered table for in-place changes.
    pub fn table_mut(&mut self) -> Option<&mut Table> {
        self.table.as_mut()
    }

    /// Returns the summary statistics.
    #[must_use]
    pub const fn summary(&self) -> Option<Summary> {
        self.summary
    }

    /// Toggles the loading indicator.
    pub fn show_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Shows an error message.
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Hides the error message.
    pub fn hide_error(&mut self) {
        self.error = None;
    }

    /// Replaces the table with one built from `records` and shows the results.
    pub fn display_table(&mut self, records: &[Record]) {
        let table = Table::from_records(records);
        debug!(
            section = %self.section,
            columns = table.columns().len(),
            rows = table.len(),
            "Rendered table"
        );
        self.table = Some(table);
        self.results_visible = true;
        if self.section.shows_summary() && !records.is_empty() {
            self.summary = Some(Summary {
                total_records: records.len(),
            });
        }
    }

    /// Sorts the rendered table by a column; see [`Table::sort_by_column`].
    pub fn sort(&mut self, column: usize) -> Option<SortDirection> {
        self.table.as_mut()?.sort_by_column(column)
    }

    /// Filters the rendered table; see [`Table::search`].
    ///
    /// Returns the number of visible rows, or `None` when nothing is rendered.
    pub fn search(&mut self, query: &str) -> Option<usize> {
        self.table.as_mut().map(|table| table.search(query))
    }
}

/// Filter controls of a report section (`<id>-years`, `<id>-state`,
/// `<id>-category`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReportControls {
    year_options: Vec<SelectOption>,
    state_options: Vec<SelectOption>,
    selected_years: BTreeSet<Year>,
    state: String,
    category: String,
}

impl ReportControls {
    /// Creates empty controls.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options of the years control.
    #[must_use]
    pub fn year_options(&self) -> &[SelectOption] {
        &self.year_options
    }

    /// Options of the state control.
    #[must_use]
    pub fn state_options(&self) -> &[SelectOption] {
        &self.state_options
    }

    /// Appends options to the years control.
    pub fn append_year_options(&mut self, options: impl IntoIterator<Item = SelectOption>) {
        self.year_options.extend(options);
    }

    /// Appends options to the state control.
    pub fn append_state_options(&mut self, options: impl IntoIterator<Item = SelectOption>) {
        self.state_options.extend(options);
    }

    /// Replaces the selected years.
    pub fn select_years(&mut self, years: impl IntoIterator<Item = Year>) {
        self.selected_years = years.into_iter().collect();
    }

    /// Returns the selected years.
    #[must_use]
    pub const fn selected_years(&self) -> &BTreeSet<Year> {
        &self.selected_years
    }

    /// Sets the state control value. An empty value means no state.
    pub fn set_state(&mut self, state: impl Into<String>) {
        self.state = state.into();
    }

    /// Sets the category control value. An empty value means no category.
    pub fn set_category(&mut self, category: impl Into<String>) {
        self.category = category.into();
    }

    /// Reads the current selection.
    #[must_use]
    pub fn selection(&self) -> FilterSelection {
        FilterSelection::new(self.selected_years.iter().copied())
            .with_state(self.state.clone())
            .with_category(self.category.clone())
    }
}

/// Controls of the comparison section (`compare-year`, `compare-report`,
/// `compare-type`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CompareControls {
    year_options: Vec<SelectOption>,
    year: Option<Year>,
    report: String,
    compare_type: String,
}

impl Default for CompareControls {
    fn default() -> Self {
        Self {
            year_options: Vec::new(),
            year: None,
            report: DEFAULT_COMPARE_REPORT.to_string(),
            compare_type: ComparisonKind::default().control_value().to_string(),
        }
    }
}

impl CompareControls {
    /// Creates controls with the default report and comparison type.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options of the year control.
    #[must_use]
    pub fn year_options(&self) -> &[SelectOption] {
        &self.year_options
    }

    /// Appends options to the year control.
    pub fn append_year_options(&mut self, options: impl IntoIterator<Item = SelectOption>) {
        self.year_options.extend(options);
    }

    /// Selects a year, or clears the selection.
    pub fn select_year(&mut self, year: Option<Year>) {
        self.year = year;
    }

    /// Returns the selected year.
    #[must_use]
    pub const fn year(&self) -> Option<Year> {
        self.year
    }

    /// Sets the report name.
    pub fn set_report(&mut self, report: impl Into<String>) {
        self.report = report.into();
    }

    /// Returns the report name.
    #[must_use]
    pub fn report(&self) -> &str {
        &self.report
    }

    /// Sets the raw comparison type value (`typology`, `economic`, `region`).
    pub fn set_compare_type(&mut self, value: impl Into<String>) {
        self.compare_type = value.into();
    }

    /// Selects a comparison type.
    pub fn set_kind(&mut self, kind: ComparisonKind) {
        self.compare_type = kind.control_value().to_string();
    }

    /// Returns the comparison selected by the type control, falling back to
    /// farm typology for unknown values.
    #[must_use]
    pub fn kind(&self) -> ComparisonKind {
        ComparisonKind::from_control_value(&self.compare_type)
    }
}
