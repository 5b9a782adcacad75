#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/farmview/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! HTTP client for the farm financial survey data API.
//!
//! [`HttpApi`] implements [`FarmApi`] against the dashboard backend:
//!
//! - `GET /api/years`, `GET /api/states`
//! - `POST /api/<report>` with a [`FilterSelection`] body
//! - `POST /api/compare-*` with a [`CompareRequest`] body
//! - `POST /api/trend-analysis` and `POST /api/custom-query`
//! - `GET /api/reports`, `/api/farm-types`, `/api/categories`, `/api/variables`
//! - `GET /health`
//!
//! Non-2xx statuses are not failures on their own: the backend answers
//! errors with a `{error}` body, which decodes to [`ApiOutcome::Error`].

use async_trait::async_trait;
use farmview_core::{
    ApiOutcome, ApiResponse, CompareRequest, ComparisonKind, CustomQuery, FarmApi, FarmError,
    FilterSelection, HealthStatus, LenientYear, MetadataKind, ReportKind, Result, StateInfo,
    TrendRequest, Year,
};
use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;

/// Default backend address for local development.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Number of body characters kept in parse error messages.
const ERROR_BODY_PREVIEW: usize = 300;

/// HTTP implementation of [`FarmApi`].
#[derive(Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl fmt::Debug for HttpApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpApi")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Default for HttpApi {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl HttpApi {
    /// Create a client for the backend at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a client with a custom HTTP client.
    #[must_use]
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Create a client whose requests give up after `timeout`.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FarmError::Network(e.to_string()))?;
        Ok(Self::with_client(client, base_url))
    }

    /// Returns the backend address.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the absolute URL for an API path.
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Make a GET request and return the response body.
    async fn get_text(&self, path: &str, query: &[(&str, &str)]) -> Result<String> {
        tracing::debug!(?query, "GET {}", path);
        let response = self
            .client
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .map_err(|e| FarmError::Network(e.to_string()))?;
        read_body(path, response).await
    }

    /// Make a JSON POST request and return the response body.
    async fn post_text<B: Serialize + ?Sized + Sync>(&self, path: &str, body: &B) -> Result<String> {
        tracing::debug!(
            body = %serde_json::to_string(body).unwrap_or_default(),
            "POST {}",
            path
        );
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| FarmError::Network(e.to_string()))?;
        read_body(path, response).await
    }
}

async fn read_body(path: &str, response: Response) -> Result<String> {
    let status = response.status();
    if !status.is_success() {
        tracing::warn!(%status, path, "Backend returned non-success status");
    }
    response
        .text()
        .await
        .map_err(|e| FarmError::Network(e.to_string()))
}

/// Query parameters for a metadata listing. Blank report filters are dropped.
fn metadata_query(kind: MetadataKind, report: Option<&str>) -> Vec<(&'static str, &str)> {
    match report.map(str::trim) {
        Some(report) if kind.takes_report_filter() && !report.is_empty() => {
            vec![("report", report)]
        }
        _ => Vec::new(),
    }
}

/// Decode a `{data}` / `{error}` body.
fn decode<T: DeserializeOwned>(text: &str) -> Result<ApiOutcome<T>> {
    let response: ApiResponse<T> = serde_json::from_str(text).map_err(|e| {
        let preview: String = text.chars().take(ERROR_BODY_PREVIEW).collect();
        FarmError::Parse(format!("{e}: {preview}"))
    })?;
    Ok(ApiOutcome::from_response(response))
}

#[async_trait]
impl FarmApi for HttpApi {
    fn name(&self) -> &str {
        "HTTP"
    }

    async fn years(&self) -> Result<ApiOutcome<Year>> {
        let text = self.get_text("/api/years", &[]).await?;
        let outcome: ApiOutcome<LenientYear> = decode(&text)?;
        Ok(outcome.map(|years| years.into_iter().map(|y| y.0).collect()))
    }

    async fn states(&self) -> Result<ApiOutcome<StateInfo>> {
        let text = self.get_text("/api/states", &[]).await?;
        decode(&text)
    }

    async fn report(&self, kind: ReportKind, filters: &FilterSelection) -> Result<ApiOutcome> {
        let text = self.post_text(kind.endpoint(), filters).await?;
        decode(&text)
    }

    async fn compare(
        &self,
        kind: ComparisonKind,
        request: &CompareRequest,
    ) -> Result<ApiOutcome> {
        let text = self.post_text(kind.endpoint(), request).await?;
        decode(&text)
    }

    async fn metadata(&self, kind: MetadataKind, report: Option<&str>) -> Result<ApiOutcome> {
        let query = metadata_query(kind, report);
        let text = self.get_text(kind.endpoint(), &query).await?;
        decode(&text)
    }

    async fn trend(&self, request: &TrendRequest) -> Result<ApiOutcome> {
        let text = self.post_text("/api/trend-analysis", request).await?;
        decode(&text)
    }

    async fn custom_query(&self, query: &CustomQuery) -> Result<ApiOutcome> {
        let text = self.post_text("/api/custom-query", query).await?;
        decode(&text)
    }

    async fn health(&self) -> Result<HealthStatus> {
        let text = self.get_text("/health", &[]).await?;
        serde_json::from_str(&text).map_err(|e| FarmError::Parse(format!("{e}: {text}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farmview_core::{CellValue, Record};

    #[test]
    fn test_url_building() {
        let api = HttpApi::new("http://localhost:5000/");
        assert_eq!(api.base_url(), "http://localhost:5000");
        assert_eq!(
            api.url("/api/income-statement"),
            "http://localhost:5000/api/income-statement"
        );
        assert_eq!(api.url("health"), "http://localhost:5000/health");
    }

    #[test]
    fn test_default_base_url() {
        assert_eq!(HttpApi::default().base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_debug_shows_base_url() {
        let api = HttpApi::new("http://farm.example");
        assert_eq!(format!("{api:?}"), r#"HttpApi { base_url: "http://farm.example" }"#);
    }

    #[test]
    fn test_metadata_query() {
        assert_eq!(
            metadata_query(MetadataKind::Variables, Some("Balance Sheet")),
            vec![("report", "Balance Sheet")]
        );
        assert!(metadata_query(MetadataKind::Variables, Some("  ")).is_empty());
        assert!(metadata_query(MetadataKind::Variables, None).is_empty());
        assert!(metadata_query(MetadataKind::Reports, Some("Balance Sheet")).is_empty());
    }

    #[test]
    fn test_decode_records() {
        let outcome: ApiOutcome<Record> =
            decode(r#"{"data": [{"year": 2020, "state": "OH", "value": null}]}"#).unwrap();
        let rows = outcome.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("state"), Some(&CellValue::Text("OH".into())));
    }

    #[test]
    fn test_decode_error_body() {
        let outcome: ApiOutcome<Record> = decode(r#"{"error": "bad state"}"#).unwrap();
        assert_eq!(outcome, ApiOutcome::Error("bad state".into()));
    }

    #[test]
    fn test_decode_html_is_parse_error() {
        let err = decode::<Record>("<!doctype html><p>Bad Gateway</p>").unwrap_err();
        match err {
            FarmError::Parse(message) => assert!(message.contains("Bad Gateway")),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_preview_is_truncated() {
        let body = "x".repeat(ERROR_BODY_PREVIEW * 2);
        let FarmError::Parse(message) = decode::<Record>(&body).unwrap_err() else {
            panic!("expected parse error");
        };
        assert!(message.len() < body.len());
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        let api = HttpApi::with_timeout("http://127.0.0.1:1", Duration::from_secs(5)).unwrap();
        let err = api.years().await.unwrap_err();
        assert!(matches!(err, FarmError::Network(_)), "got {err:?}");
    }
}
