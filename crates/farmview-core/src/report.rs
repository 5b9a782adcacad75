//! Report and comparison kinds.
//!
//! This module defines [`ReportKind`] for the per-report endpoints and
//! [`ComparisonKind`] for the cross-group comparison endpoints.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FarmError;

/// Report requested by a comparison when none is chosen.
pub const DEFAULT_COMPARE_REPORT: &str = ReportKind::IncomeStatement.report_name();

/// Breakdown categories offered by the report filters, as `(value, label)`.
pub const CATEGORIES: &[(&str, &str)] = &[
    ("collapsed farm typology", "Farm Typology"),
    ("economic class", "Economic Class"),
    ("nass region", "NASS Region"),
    ("operator age", "Operator Age"),
];

/// A survey report served by a `POST /api/<endpoint>` route taking a
/// [`FilterSelection`](crate::types::FilterSelection) body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    /// Farm business income statement.
    IncomeStatement,
    /// Farm business balance sheet.
    BalanceSheet,
    /// Farm business financial ratios.
    FinancialRatios,
    /// Structural characteristics.
    StructuralCharacteristics,
    /// Government payments.
    GovernmentPayments,
    /// Operator household income.
    OperatorHouseholdIncome,
}

impl ReportKind {
    /// Report kinds that have their own dashboard section.
    pub const SECTIONS: [Self; 4] = [
        Self::IncomeStatement,
        Self::BalanceSheet,
        Self::FinancialRatios,
        Self::StructuralCharacteristics,
    ];

    /// Returns every report kind.
    #[must_use]
    pub const fn all() -> [Self; 6] {
        [
            Self::IncomeStatement,
            Self::BalanceSheet,
            Self::FinancialRatios,
            Self::StructuralCharacteristics,
            Self::GovernmentPayments,
            Self::OperatorHouseholdIncome,
        ]
    }

    /// API path for this report.
    #[must_use]
    pub const fn endpoint(&self) -> &'static str {
        match self {
            Self::IncomeStatement => "/api/income-statement",
            Self::BalanceSheet => "/api/balance-sheet",
            Self::FinancialRatios => "/api/financial-ratios",
            Self::StructuralCharacteristics => "/api/structural-characteristics",
            Self::GovernmentPayments => "/api/government-payments",
            Self::OperatorHouseholdIncome => "/api/operator-household-income",
        }
    }

    /// Short name used on the command line.
    #[must_use]
    pub const fn short_name(&self) -> &'static str {
        match self {
            Self::IncomeStatement => "income",
            Self::BalanceSheet => "balance",
            Self::FinancialRatios => "ratios",
            Self::StructuralCharacteristics => "structure",
            Self::GovernmentPayments => "government-payments",
            Self::OperatorHouseholdIncome => "household-income",
        }
    }

    /// Survey report name as the upstream API spells it.
    #[must_use]
    pub const fn report_name(&self) -> &'static str {
        match self {
            Self::IncomeStatement => "Farm Business Income Statement",
            Self::BalanceSheet => "Farm Business Balance Sheet",
            Self::FinancialRatios => "Farm Business Financial Ratios",
            Self::StructuralCharacteristics => "Structural Characteristics",
            Self::GovernmentPayments => "Government Payments",
            Self::OperatorHouseholdIncome => "Operator Household Income",
        }
    }

    /// Short heading used in listings.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::IncomeStatement => "Income Statement",
            Self::BalanceSheet => "Balance Sheet",
            Self::FinancialRatios => "Financial Ratios",
            Self::StructuralCharacteristics => "Structural Characteristics",
            Self::GovernmentPayments => "Government Payments",
            Self::OperatorHouseholdIncome => "Operator Household Income",
        }
    }

    /// Message shown when the report comes back without rows.
    #[must_use]
    pub const fn empty_message(&self) -> &'static str {
        match self {
            Self::IncomeStatement => {
                "No data available for the selected criteria. Try different filters."
            }
            _ => "No data available for the selected criteria.",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for ReportKind {
    type Err = FarmError;

    /// Accepts the short name (`income`) or the endpoint slug
    /// (`income-statement`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::all()
            .into_iter()
            .find(|kind| {
                kind.short_name().eq_ignore_ascii_case(s)
                    || kind.endpoint().trim_start_matches("/api/").eq_ignore_ascii_case(s)
            })
            .ok_or_else(|| FarmError::InvalidParameter(format!("Unknown report: {s}")))
    }
}

/// A grouping served by one of the `POST /api/compare-*` routes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComparisonKind {
    /// Collapsed farm typology.
    #[default]
    FarmTypology,
    /// Economic (sales) class.
    EconomicClass,
    /// NASS region.
    Region,
}

impl ComparisonKind {
    /// Returns every comparison kind.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::FarmTypology, Self::EconomicClass, Self::Region]
    }

    /// API path for this comparison.
    #[must_use]
    pub const fn endpoint(&self) -> &'static str {
        match self {
            Self::FarmTypology => "/api/compare-farm-typology",
            Self::EconomicClass => "/api/compare-economic-class",
            Self::Region => "/api/compare-regions",
        }
    }

    /// Value carried by the comparison type control.
    #[must_use]
    pub const fn control_value(&self) -> &'static str {
        match self {
            Self::FarmTypology => "typology",
            Self::EconomicClass => "economic",
            Self::Region => "region",
        }
    }

    /// Heading used in listings.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::FarmTypology => "Farm Typology",
            Self::EconomicClass => "Economic Class",
            Self::Region => "NASS Region",
        }
    }

    /// Reads a comparison type control. Unknown values select farm typology.
    #[must_use]
    pub fn from_control_value(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl fmt::Display for ComparisonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for ComparisonKind {
    type Err = FarmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|kind| kind.control_value().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                FarmError::InvalidParameter(format!(
                    "Unknown comparison type: {s}. Supported: typology, economic, region"
                ))
            })
    }
}

/// A metadata listing served by a `GET /api/<endpoint>` route.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetadataKind {
    /// Survey reports.
    Reports,
    /// Farm types.
    FarmTypes,
    /// Breakdown categories and their values.
    Categories,
    /// Survey variables; can be narrowed to one report.
    Variables,
}

impl MetadataKind {
    /// Returns every metadata kind.
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [Self::Reports, Self::FarmTypes, Self::Categories, Self::Variables]
    }

    /// API path for this listing.
    #[must_use]
    pub const fn endpoint(&self) -> &'static str {
        match self {
            Self::Reports => "/api/reports",
            Self::FarmTypes => "/api/farm-types",
            Self::Categories => "/api/categories",
            Self::Variables => "/api/variables",
        }
    }

    /// Short name used on the command line.
    #[must_use]
    pub const fn short_name(&self) -> &'static str {
        match self {
            Self::Reports => "reports",
            Self::FarmTypes => "farm-types",
            Self::Categories => "categories",
            Self::Variables => "variables",
        }
    }

    /// Returns true if the listing accepts a `report` filter.
    #[must_use]
    pub const fn takes_report_filter(&self) -> bool {
        matches!(self, Self::Variables)
    }
}

impl fmt::Display for MetadataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for MetadataKind {
    type Err = FarmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|kind| kind.short_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                FarmError::InvalidParameter(format!(
                    "Unknown listing: {s}. Supported: reports, farm-types, categories, variables"
                ))
            })
    }
}
