//! API trait for the survey data backend.
//!
//! [`FarmApi`] is the seam between the view layer and the network. The HTTP
//! implementation lives in `farmview-http`; tests drive the dashboard with
//! in-process fakes.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::{FarmError, Result},
    report::{ComparisonKind, MetadataKind, ReportKind},
    types::{
        ApiOutcome, CompareRequest, CustomQuery, FilterSelection, HealthStatus, StateInfo,
        TrendRequest, Year,
    },
};

/// Access to the survey data backend.
///
/// Every data call resolves to an [`ApiOutcome`] when a response body was
/// received and decoded, including server-reported errors. `Err` is reserved
/// for transport and decoding failures.
#[async_trait]
pub trait FarmApi: Send + Sync + Debug {
    /// Returns a short name for this backend (used in logs).
    fn name(&self) -> &str;

    /// Fetches the available survey years (`GET /api/years`).
    async fn years(&self) -> Result<ApiOutcome<Year>>;

    /// Fetches the available states (`GET /api/states`).
    async fn states(&self) -> Result<ApiOutcome<StateInfo>>;

    /// Fetches one report for the given filters.
    async fn report(&self, kind: ReportKind, filters: &FilterSelection) -> Result<ApiOutcome>;

    /// Fetches a cross-group comparison.
    async fn compare(&self, kind: ComparisonKind, request: &CompareRequest)
    -> Result<ApiOutcome>;

    /// Fetches a metadata listing. `report` narrows the variables listing
    /// and is ignored by the others.
    async fn metadata(&self, kind: MetadataKind, report: Option<&str>) -> Result<ApiOutcome>;

    /// Fetches a variable over a range of years (`POST /api/trend-analysis`).
    async fn trend(&self, request: &TrendRequest) -> Result<ApiOutcome>;

    /// Runs a free-form survey query (`POST /api/custom-query`).
    async fn custom_query(&self, query: &CustomQuery) -> Result<ApiOutcome>;

    /// Checks backend health (`GET /health`).
    ///
    /// Default implementation reports the call as unsupported.
    async fn health(&self) -> Result<HealthStatus> {
        Err(FarmError::NotSupported(format!(
            "{} does not expose a health check",
            self.name()
        )))
    }
}
