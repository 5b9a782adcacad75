//! In-process backend for controller and dashboard tests.

use async_trait::async_trait;
use std::sync::Mutex;

use farmview_core::{
    ApiOutcome, CompareRequest, ComparisonKind, CustomQuery, FarmApi, FarmError, FilterSelection,
    MetadataKind, Record, ReportKind, Result, StateInfo, TrendRequest, Year,
};

/// Canned reply for one endpoint.
#[derive(Clone, Debug)]
pub(crate) enum Reply<T> {
    Data(Vec<T>),
    Empty,
    Error(String),
    Fail(String),
}

impl<T: Clone> Reply<T> {
    fn outcome(&self) -> Result<ApiOutcome<T>> {
        match self {
            Self::Data(rows) => Ok(ApiOutcome::Data(rows.clone())),
            Self::Empty => Ok(ApiOutcome::Empty),
            Self::Error(message) => Ok(ApiOutcome::Error(message.clone())),
            Self::Fail(message) => Err(FarmError::Network(message.clone())),
        }
    }
}

/// A request the fake received.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Call {
    Years,
    States,
    Report(ReportKind, FilterSelection),
    Compare(ComparisonKind, CompareRequest),
    Metadata(MetadataKind, Option<String>),
    Trend(TrendRequest),
    Query(CustomQuery),
}

#[derive(Debug)]
pub(crate) struct FakeApi {
    pub(crate) years: Reply<Year>,
    pub(crate) states: Reply<StateInfo>,
    pub(crate) data: Reply<Record>,
    calls: Mutex<Vec<Call>>,
}

impl FakeApi {
    pub(crate) fn new(data: Reply<Record>) -> Self {
        Self {
            years: Reply::Empty,
            states: Reply::Empty,
            data,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl FarmApi for FakeApi {
    fn name(&self) -> &str {
        "fake"
    }

    async fn years(&self) -> Result<ApiOutcome<Year>> {
        self.record(Call::Years);
        self.years.outcome()
    }

    async fn states(&self) -> Result<ApiOutcome<StateInfo>> {
        self.record(Call::States);
        self.states.outcome()
    }

    async fn report(&self, kind: ReportKind, filters: &FilterSelection) -> Result<ApiOutcome> {
        self.record(Call::Report(kind, filters.clone()));
        self.data.outcome()
    }

    async fn compare(
        &self,
        kind: ComparisonKind,
        request: &CompareRequest,
    ) -> Result<ApiOutcome> {
        self.record(Call::Compare(kind, request.clone()));
        self.data.outcome()
    }

    async fn metadata(&self, kind: MetadataKind, report: Option<&str>) -> Result<ApiOutcome> {
        self.record(Call::Metadata(kind, report.map(str::to_string)));
        self.data.outcome()
    }

    async fn trend(&self, request: &TrendRequest) -> Result<ApiOutcome> {
        self.record(Call::Trend(request.clone()));
        self.data.outcome()
    }

    async fn custom_query(&self, query: &CustomQuery) -> Result<ApiOutcome> {
        self.record(Call::Query(query.clone()));
        self.data.outcome()
    }
}
