//! Wire and domain types for the survey data API.
//!
//! This module defines the data structures exchanged with the backend:
//!
//! - [`Record`] - One row of tabular data, an ordered key/value mapping
//! - [`CellValue`] - A single value inside a record
//! - [`ApiResponse`] - The raw `{data, error}` response body
//! - [`ApiOutcome`] - Tagged interpretation of a response
//! - [`FilterSelection`] - Request body for report endpoints
//! - [`CompareRequest`] - Request body for comparison endpoints
//! - [`StateInfo`] / [`SelectOption`] - Dropdown metadata

use indexmap::IndexMap;
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::Result;

/// A survey year.
pub type Year = i32;

/// A single value inside a [`Record`].
///
/// The backend sends numbers, strings and nulls. Booleans and nested JSON are
/// kept rather than rejected so one odd column does not fail a whole response.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    /// JSON `null` or a missing key.
    #[default]
    Null,
    /// JSON boolean.
    Bool(bool),
    /// Any JSON number.
    Number(f64),
    /// JSON string.
    Text(String),
    /// Arrays and objects, kept verbatim.
    Json(serde_json::Value),
}

impl From<serde_json::Value> for CellValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => match n.as_f64() {
                Some(f) => Self::Number(f),
                None => Self::Json(Value::Number(n)),
            },
            Value::String(s) => Self::Text(s),
            other => Self::Json(other),
        }
    }
}

impl<'de> Deserialize<'de> for CellValue {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde_json::Value::deserialize(deserializer).map(Self::from)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl<T: Into<Self>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// One row of server-returned tabular data.
///
/// Keys keep the order in which they arrived on the wire; the table renderer
/// derives its columns from that order. A repeated key keeps its first
/// position and takes the last value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(IndexMap<String, CellValue>);

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field and returns the record.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts a field. An existing key keeps its position and takes the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<CellValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.0.get(key)
    }

    /// Returns the keys in wire order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Raw response body: `{data: [...]}` or `{error: "..."}`.
#[derive(Clone, Debug, Deserialize)]
pub struct ApiResponse<T> {
    /// Payload rows, when present.
    pub data: Option<Vec<T>>,
    /// Server-reported error, when present. Kept as raw JSON because the
    /// backend forwards upstream errors of varying shape.
    pub error: Option<serde_json::Value>,
}

/// Tagged interpretation of an [`ApiResponse`].
#[derive(Clone, Debug, PartialEq)]
pub enum ApiOutcome<T = Record> {
    /// At least one row of data.
    Data(Vec<T>),
    /// No error, but nothing to show.
    Empty,
    /// The server reported an error; the message is shown verbatim.
    Error(String),
}

impl<T> ApiOutcome<T> {
    /// Classifies a raw response.
    ///
    /// A non-empty error wins over data. Empty strings, `false`, `0` and
    /// `null` do not count as errors.
    #[must_use]
    pub fn from_response(response: ApiResponse<T>) -> Self {
        if let Some(message) = response.error.as_ref().and_then(error_message) {
            return Self::Error(message);
        }
        match response.data {
            Some(rows) if !rows.is_empty() => Self::Data(rows),
            _ => Self::Empty,
        }
    }

    /// Returns the rows, or an empty slice.
    #[must_use]
    pub fn rows(&self) -> &[T] {
        match self {
            Self::Data(rows) => rows,
            _ => &[],
        }
    }

    /// Maps the rows of a [`ApiOutcome::Data`] outcome.
    pub fn map<U>(self, f: impl FnOnce(Vec<T>) -> Vec<U>) -> ApiOutcome<U> {
        match self {
            Self::Data(rows) => {
                let mapped = f(rows);
                if mapped.is_empty() {
                    ApiOutcome::Empty
                } else {
                    ApiOutcome::Data(mapped)
                }
            }
            Self::Empty => ApiOutcome::Empty,
            Self::Error(message) => ApiOutcome::Error(message),
        }
    }
}

impl<T: DeserializeOwned> ApiOutcome<T> {
    /// Decodes a response body.
    pub fn from_json(body: &str) -> Result<Self> {
        let response: ApiResponse<T> = serde_json::from_str(body)?;
        Ok(Self::from_response(response))
    }
}

fn error_message(value: &serde_json::Value) -> Option<String> {
    use serde_json::Value;
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

/// A year as delivered by `/api/years`: a bare number or a numeric string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LenientYear(pub Year);

impl<'de> Deserialize<'de> for LenientYear {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(i64),
            Text(String),
        }

        let year = match Repr::deserialize(deserializer)? {
            Repr::Number(n) => n,
            Repr::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| de::Error::custom(format!("invalid year: {s:?}")))?,
        };
        Year::try_from(year)
            .map(Self)
            .map_err(|_| de::Error::custom(format!("year out of range: {year}")))
    }
}

/// State identifier as sent by `/api/states`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateId {
    /// Numeric id.
    Number(i64),
    /// String id or code.
    Text(String),
}

impl StateId {
    /// Returns true for ids that should be used as the option value: a
    /// non-zero number or a non-empty string.
    #[must_use]
    pub fn is_set(&self) -> bool {
        match self {
            Self::Number(n) => *n != 0,
            Self::Text(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A state entry from `/api/states`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateInfo {
    /// Backend identifier.
    #[serde(default)]
    pub id: Option<StateId>,
    /// Display name.
    #[serde(default)]
    pub name: String,
}

impl StateInfo {
    /// Creates a state entry.
    #[must_use]
    pub fn new(id: Option<StateId>, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Value submitted for this state: the id when set, otherwise the name.
    #[must_use]
    pub fn option_value(&self) -> String {
        match &self.id {
            Some(id) if id.is_set() => id.to_string(),
            _ => self.name.clone(),
        }
    }

    /// Converts the entry to a dropdown option.
    #[must_use]
    pub fn to_option(&self) -> SelectOption {
        SelectOption::new(self.option_value(), self.name.clone())
    }
}

/// A dropdown entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Submitted value.
    pub value: String,
    /// Displayed text.
    pub label: String,
}

impl SelectOption {
    /// Creates an option.
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

impl From<Year> for SelectOption {
    fn from(year: Year) -> Self {
        let text = year.to_string();
        Self::new(text.clone(), text)
    }
}

/// Filters sent to the report endpoints.
///
/// Serializes as `{years: [...], state?: "...", category?: "..."}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    /// Selected years.
    pub years: BTreeSet<Year>,
    /// Selected state value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Selected breakdown category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl FilterSelection {
    /// Creates a selection for the given years.
    #[must_use]
    pub fn new(years: impl IntoIterator<Item = Year>) -> Self {
        Self {
            years: years.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Sets the state. An empty string clears it.
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = non_empty(state.into());
        self
    }

    /// Sets the category. An empty string clears it.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = non_empty(category.into());
        self
    }

    /// Returns true if at least one year is selected.
    #[must_use]
    pub fn has_years(&self) -> bool {
        !self.years.is_empty()
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

/// Body sent to the comparison endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareRequest {
    /// Survey year.
    pub year: Year,
    /// Report name, e.g. `Farm Business Income Statement`.
    pub report: String,
}

impl CompareRequest {
    /// Creates a comparison request.
    #[must_use]
    pub fn new(year: Year, report: impl Into<String>) -> Self {
        Self {
            year,
            report: report.into(),
        }
    }
}

/// Body sent to `/api/trend-analysis`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendRequest {
    /// First survey year, inclusive.
    pub start_year: Year,
    /// Last survey year, inclusive.
    pub end_year: Year,
    /// Survey variable to follow.
    pub variable: String,
    /// State value; the backend defaults to all states.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl TrendRequest {
    /// Creates a trend request across all states.
    #[must_use]
    pub fn new(start_year: Year, end_year: Year, variable: impl Into<String>) -> Self {
        Self {
            start_year,
            end_year,
            variable: variable.into(),
            state: None,
        }
    }

    /// Sets the state. An empty string clears it.
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = non_empty(state.into());
        self
    }

    /// Returns true if a variable is named.
    #[must_use]
    pub fn has_variable(&self) -> bool {
        !self.variable.trim().is_empty()
    }
}

/// Body sent to `/api/custom-query`: survey data with every filter the
/// backend understands.
///
/// Unset fields are left out of the body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CustomQuery {
    /// Selected years.
    pub years: BTreeSet<Year>,
    /// State value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Report name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
    /// Survey variable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable: Option<String>,
    /// Farm type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farmtype: Option<String>,
    /// First breakdown category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Value within the first category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_value: Option<String>,
    /// Second breakdown category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category2: Option<String>,
}

impl CustomQuery {
    /// Creates a query for the given years with no other filter.
    #[must_use]
    pub fn new(years: impl IntoIterator<Item = Year>) -> Self {
        Self {
            years: years.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Returns true if the query names a report or a variable; the backend
    /// rejects queries with neither.
    #[must_use]
    pub const fn has_subject(&self) -> bool {
        self.report.is_some() || self.variable.is_some()
    }
}

/// Body returned by `/health`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Reported status, `healthy` when up.
    #[serde(default)]
    pub status: String,
    /// Service name.
    #[serde(default)]
    pub service: String,
    /// Service version.
    #[serde(default)]
    pub version: String,
}

impl HealthStatus {
    /// Returns true if the backend reports itself healthy.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_keeps_wire_order() {
        let record: Record =
            serde_json::from_str(r#"{"zeta": 1, "alpha": "x", "mid": null}"#).unwrap();
        let keys: Vec<_> = record.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(record.get("zeta"), Some(&CellValue::Number(1.0)));
        assert_eq!(record.get("alpha"), Some(&CellValue::Text("x".into())));
        assert_eq!(record.get("mid"), Some(&CellValue::Null));
    }

    #[test]
    fn test_record_duplicate_key_last_wins() {
        let record: Record = serde_json::from_str(r#"{"a": 1, "b": 2, "a": 3}"#).unwrap();
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("a"), Some(&CellValue::Number(3.0)));
    }

    #[test]
    fn test_cell_value_odd_shapes() {
        let record: Record =
            serde_json::from_str(r#"{"flag": true, "nested": {"k": 1}, "list": [1, 2]}"#)
                .unwrap();
        assert_eq!(record.get("flag"), Some(&CellValue::Bool(true)));
        assert_eq!(
            record.get("nested"),
            Some(&CellValue::Json(json!({"k": 1})))
        );
        assert!(matches!(record.get("list"), Some(CellValue::Json(_))));
    }

    #[test]
    fn test_outcome_data() {
        let outcome: ApiOutcome = ApiOutcome::from_json(r#"{"data": [{"a": 1, "b": "x"}]}"#).unwrap();
        assert!(matches!(outcome, ApiOutcome::Data(_)));
        assert_eq!(outcome.rows().len(), 1);
    }

    #[test]
    fn test_outcome_from_records_of_any_row_type() {
        let outcome: ApiOutcome<StateInfo> =
            ApiOutcome::from_json(r#"{"data": [{"id": "OH", "name": "Ohio"}]}"#).unwrap();
        assert_eq!(outcome.rows()[0].option_value(), "OH");
    }

    #[test]
    fn test_record_from_iter_replaces_in_place() {
        let record: Record = [("a", 1), ("b", 2), ("a", 3)].into_iter().collect();
        let keys: Vec<_> = record.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(record.get("a"), Some(&CellValue::Number(3.0)));
    }

    #[test]
    fn test_outcome_error_wins() {
        let outcome: ApiOutcome =
            ApiOutcome::from_json(r#"{"error": "bad state", "data": [{"a": 1}]}"#).unwrap();
        assert_eq!(outcome, ApiOutcome::Error("bad state".into()));
    }

    #[test]
    fn test_outcome_empty_variants() {
        for body in [r#"{"data": []}"#, r#"{}"#, r#"{"data": null}"#, r#"{"error": ""}"#] {
            let outcome: ApiOutcome = ApiOutcome::from_json(body).unwrap();
            assert_eq!(outcome, ApiOutcome::Empty, "body: {body}");
        }
    }

    #[test]
    fn test_outcome_structured_error_is_stringified() {
        let outcome: ApiOutcome =
            ApiOutcome::from_json(r#"{"error": {"code": 400}}"#).unwrap();
        assert_eq!(outcome, ApiOutcome::Error(r#"{"code":400}"#.into()));
    }

    #[test]
    fn test_outcome_malformed_body() {
        assert!(ApiOutcome::<Record>::from_json("<html>oops</html>").is_err());
    }

    #[test]
    fn test_lenient_year() {
        let years: ApiOutcome<LenientYear> =
            ApiOutcome::from_json(r#"{"data": [2021, "2019", " 2020 "]}"#).unwrap();
        let years: Vec<Year> = years.rows().iter().map(|y| y.0).collect();
        assert_eq!(years, vec![2021, 2019, 2020]);
    }

    #[test]
    fn test_state_option_value() {
        let with_id = StateInfo::new(Some(StateId::Text("OH".into())), "Ohio");
        assert_eq!(with_id.option_value(), "OH");

        let zero_id = StateInfo::new(Some(StateId::Number(0)), "All");
        assert_eq!(zero_id.option_value(), "All");

        let no_id = StateInfo::new(None, "Iowa");
        assert_eq!(no_id.to_option(), SelectOption::new("Iowa", "Iowa"));
    }

    #[test]
    fn test_filter_selection_body() {
        let selection = FilterSelection::new([2020, 2019])
            .with_state("all")
            .with_category("");
        assert_eq!(
            serde_json::to_value(&selection).unwrap(),
            json!({"years": [2019, 2020], "state": "all"})
        );
        assert!(!FilterSelection::default().has_years());
    }

    #[test]
    fn test_trend_request_body() {
        let req = TrendRequest::new(2015, 2020, "Net farm income").with_state("");
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"start_year": 2015, "end_year": 2020, "variable": "Net farm income"})
        );
        assert!(req.has_variable());
        assert!(!TrendRequest::new(2015, 2020, " ").has_variable());
    }

    #[test]
    fn test_custom_query_body() {
        let mut query = CustomQuery::new([2020]);
        assert!(!query.has_subject());

        query.variable = Some("Total acres".into());
        query.category = Some("economic class".into());
        assert!(query.has_subject());
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({"years": [2020], "variable": "Total acres", "category": "economic class"})
        );
    }

    #[test]
    fn test_compare_request_body() {
        let req = CompareRequest::new(2020, "Farm Business Balance Sheet");
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"year": 2020, "report": "Farm Business Balance Sheet"})
        );
    }
}
