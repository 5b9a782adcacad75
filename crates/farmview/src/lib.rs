#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/farmview/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! View layer for the farm financial dashboard.
//!
//! This crate re-exports [`farmview_core`] and, with the `http` feature
//! (on by default), the [`HttpApi`] client.

/// Fetch controllers.
pub mod controller;
/// The five-section dashboard.
pub mod dashboard;
#[cfg(test)]
mod fake;
/// Text, HTML and JSON renderers.
pub mod render;
/// Section view state and filter controls.
pub mod view;

pub use farmview_core::*;

#[cfg(feature = "http")]
pub use farmview_http::HttpApi;

pub use dashboard::{CompareSection, Dashboard, ReportSection};
pub use render::OutputFormat;
pub use view::{CompareControls, ReportControls, SectionId, SectionView, Summary};
