//! The five-section dashboard.

use tracing::{debug, error, info};

use farmview_core::{ApiOutcome, FarmApi, ReportKind, Result, SelectOption, StateInfo, Year};

use crate::controller;
use crate::view::{CompareControls, ReportControls, SectionId, SectionView};

/// A report section: filter controls plus view state.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportSection {
    /// Years, state and category controls.
    pub controls: ReportControls,
    /// Rendered state.
    pub view: SectionView,
}

impl ReportSection {
    fn new(section: SectionId) -> Self {
        Self {
            controls: ReportControls::new(),
            view: SectionView::new(section),
        }
    }
}

/// The comparison section: controls plus view state.
#[derive(Clone, Debug, PartialEq)]
pub struct CompareSection {
    /// Year, report and comparison type controls.
    pub controls: CompareControls,
    /// Rendered state.
    pub view: SectionView,
}

/// Dashboard with five independent sections sharing one backend.
///
/// Sections never read each other's state. Each fetch borrows the dashboard
/// mutably, so triggers on one dashboard run one at a time.
#[derive(Debug)]
pub struct Dashboard<A> {
    api: A,
    income: ReportSection,
    balance: ReportSection,
    ratios: ReportSection,
    structure: ReportSection,
    compare: CompareSection,
}

impl<A: FarmApi> Dashboard<A> {
    /// Create a dashboard with empty controls.
    #[must_use]
    pub fn new(api: A) -> Self {
        Self {
            api,
            income: ReportSection::new(SectionId::Income),
            balance: ReportSection::new(SectionId::Balance),
            ratios: ReportSection::new(SectionId::Ratios),
            structure: ReportSection::new(SectionId::Structure),
            compare: CompareSection {
                controls: CompareControls::new(),
                view: SectionView::new(SectionId::Compare),
            },
        }
    }

    /// Returns the backend.
    #[must_use]
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Returns the view state of a section.
    #[must_use]
    pub const fn section(&self, id: SectionId) -> &SectionView {
        match id {
            SectionId::Income => &self.income.view,
            SectionId::Balance => &self.balance.view,
            SectionId::Ratios => &self.ratios.view,
            SectionId::Structure => &self.structure.view,
            SectionId::Compare => &self.compare.view,
        }
    }

    /// Returns the mutable view state of a section, for sorting and searching.
    pub fn section_mut(&mut self, id: SectionId) -> &mut SectionView {
        match id {
            SectionId::Income => &mut self.income.view,
            SectionId::Balance => &mut self.balance.view,
            SectionId::Ratios => &mut self.ratios.view,
            SectionId::Structure => &mut self.structure.view,
            SectionId::Compare => &mut self.compare.view,
        }
    }

    /// Returns a report section, or `None` for [`SectionId::Compare`].
    #[must_use]
    pub const fn report_section(&self, id: SectionId) -> Option<&ReportSection> {
        match id {
            SectionId::Income => Some(&self.income),
            SectionId::Balance => Some(&self.balance),
            SectionId::Ratios => Some(&self.ratios),
            SectionId::Structure => Some(&self.structure),
            SectionId::Compare => None,
        }
    }

    /// Returns the controls of a report section, or `None` for
    /// [`SectionId::Compare`].
    pub fn report_controls_mut(&mut self, id: SectionId) -> Option<&mut ReportControls> {
        self.report_sections_mut()
            .into_iter()
            .find(|section| section.view.section() == id)
            .map(|section| &mut section.controls)
    }

    /// Returns the comparison section.
    #[must_use]
    pub const fn compare_section(&self) -> &CompareSection {
        &self.compare
    }

    /// Returns the comparison controls.
    pub fn compare_controls_mut(&mut self) -> &mut CompareControls {
        &mut self.compare.controls
    }

    fn report_sections_mut(&mut self) -> [&mut ReportSection; 4] {
        [
            &mut self.income,
            &mut self.balance,
            &mut self.ratios,
            &mut self.structure,
        ]
    }

    /// Loads years and states and appends them to the filter controls.
    ///
    /// Both lists load concurrently and independently; a failure is logged
    /// and leaves the affected controls unchanged. Calling this twice
    /// appends the options twice.
    pub async fn populate_filters(&mut self) {
        let (years, states) = tokio::join!(self.api.years(), self.api.states());
        self.apply_years(years);
        self.apply_states(states);
    }

    /// Loads the years into every section's year control, most recent first.
    pub async fn load_years(&mut self) {
        let years = self.api.years().await;
        self.apply_years(years);
    }

    /// Loads the states into the four report sections' state controls.
    pub async fn load_states(&mut self) {
        let states = self.api.states().await;
        self.apply_states(states);
    }

    fn apply_years(&mut self, result: Result<ApiOutcome<Year>>) {
        let mut years = match result {
            Ok(ApiOutcome::Data(years)) => years,
            Ok(ApiOutcome::Empty) => {
                debug!("No years available");
                return;
            }
            Ok(ApiOutcome::Error(message)) => {
                error!(%message, "Error loading years");
                return;
            }
            Err(e) => {
                error!(error = %e, "Error loading years");
                return;
            }
        };
        years.sort_unstable_by(|a, b| b.cmp(a));
        let options: Vec<SelectOption> = years.into_iter().map(SelectOption::from).collect();

        for section in self.report_sections_mut() {
            section.controls.append_year_options(options.iter().cloned());
        }
        self.compare.controls.append_year_options(options.iter().cloned());
        info!(count = options.len(), "Loaded years");
    }

    fn apply_states(&mut self, result: Result<ApiOutcome<StateInfo>>) {
        let states = match result {
            Ok(ApiOutcome::Data(states)) => states,
            Ok(ApiOutcome::Empty) => {
                debug!("No states available");
                return;
            }
            Ok(ApiOutcome::Error(message)) => {
                error!(%message, "Error loading states");
                return;
            }
            Err(e) => {
                error!(error = %e, "Error loading states");
                return;
            }
        };
        let options: Vec<SelectOption> = states.iter().map(StateInfo::to_option).collect();

        for section in self.report_sections_mut() {
            section.controls.append_state_options(options.iter().cloned());
        }
        info!(count = options.len(), "Loaded states");
    }

    /// Runs the fetch controller of a section with its current controls.
    pub async fn fetch(&mut self, id: SectionId) {
        let Self {
            api,
            income,
            balance,
            ratios,
            structure,
            compare,
        } = self;

        let (section, kind) = match id {
            SectionId::Income => (income, ReportKind::IncomeStatement),
            SectionId::Balance => (balance, ReportKind::BalanceSheet),
            SectionId::Ratios => (ratios, ReportKind::FinancialRatios),
            SectionId::Structure => (structure, ReportKind::StructuralCharacteristics),
            SectionId::Compare => {
                let kind = compare.controls.kind();
                let year = compare.controls.year();
                controller::fetch_comparison(
                    &*api,
                    kind,
                    year,
                    compare.controls.report(),
                    &mut compare.view,
                )
                .await;
                return;
            }
        };

        let selection = section.controls.selection();
        controller::fetch_report(&*api, kind, &selection, &mut section.view).await;
    }

    /// Runs the comparison controller.
    pub async fn perform_comparison(&mut self) {
        self.fetch(SectionId::Compare).await;
    }
}
