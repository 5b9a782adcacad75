#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/farmview/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for the farm financial dashboard.
//!
//! This crate provides the foundational abstractions shared by the HTTP client
//! and the view layer:
//!
//! - [`FarmApi`](api::FarmApi) - Async boundary to the survey data backend
//! - [`ApiOutcome`](types::ApiOutcome) - Tagged decoding of `{data}` / `{error}` responses
//! - [`Table`](table::Table) - Rendered table with column sort and row search
//! - [`format_value`](format::format_value) - Cell formatting

/// API trait for the survey data backend.
pub mod api;
/// Error types for dashboard operations.
pub mod error;
/// Cell and column name formatting.
pub mod format;
/// Report and comparison kinds with their endpoints.
pub mod report;
/// Rendered table model with sort and search.
pub mod table;
/// Wire and domain types (records, filters, responses).
pub mod types;

// Re-export commonly used items at crate root
pub use api::FarmApi;
pub use error::{FarmError, Result};
pub use format::{NULL_PLACEHOLDER, format_column_name, format_number, format_value};
pub use report::{ComparisonKind, MetadataKind, ReportKind};
pub use table::{Column, Row, SortDirection, SortKind, Table};
pub use types::{
    ApiOutcome, ApiResponse, CellValue, CompareRequest, CustomQuery, FilterSelection, HealthStatus,
    LenientYear, Record, SelectOption, StateId, StateInfo, TrendRequest, Year,
};
