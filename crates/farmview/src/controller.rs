//! Fetch controllers.
//!
//! A controller validates the selection, toggles the section's loading flag
//! around one request, and writes the outcome into the [`SectionView`]:
//! a table on data, a message on empty data, the server's message on a
//! reported error, or `Failed to fetch data: ...` when the request itself
//! failed. There is no retry, de-duplication or cancellation.

use tracing::{debug, instrument, warn};

use farmview_core::{
    ApiOutcome, CompareRequest, ComparisonKind, CustomQuery, FarmApi, FilterSelection,
    MetadataKind, Record, ReportKind, Result, TrendRequest, Year,
};

use crate::view::SectionView;

/// Shown when a report is triggered without any year selected.
pub const MISSING_YEARS_MESSAGE: &str = "Please select at least one year";

/// Shown when a comparison is triggered without a year.
pub const MISSING_YEAR_MESSAGE: &str = "Please select a year";

/// Shown when a comparison comes back without rows.
pub const EMPTY_COMPARISON_MESSAGE: &str = "No comparison data available for the selected criteria.";

/// Shown when a trend is requested without a variable.
pub const MISSING_VARIABLE_MESSAGE: &str = "Variable is required";

/// Shown when a custom query names neither a report nor a variable.
pub const MISSING_SUBJECT_MESSAGE: &str = "Either report or variable is required";

/// Shown when a trend, custom query or listing comes back without rows.
pub const EMPTY_QUERY_MESSAGE: &str = "No data available for the selected criteria.";

/// Prefix of transport and decoding failure messages.
pub const FETCH_FAILED_PREFIX: &str = "Failed to fetch data: ";

/// Fetches one report into `view`.
///
/// With no year selected the error is shown and no request is sent.
#[instrument(skip(api, selection, view), fields(api = api.name(), section = %view.section()))]
pub async fn fetch_report<A: FarmApi + ?Sized>(
    api: &A,
    kind: ReportKind,
    selection: &FilterSelection,
    view: &mut SectionView,
) {
    if !selection.has_years() {
        debug!("No years selected, request not sent");
        view.show_error(MISSING_YEARS_MESSAGE);
        return;
    }

    view.show_loading(true);
    view.hide_error();
    let records = fetch_records(api, kind, selection).await;
    apply_records(view, records);
    view.show_loading(false);
}

/// Fetches one report's records without a view.
///
/// `Err` carries the message a section would show instead of a table.
pub async fn fetch_records<A: FarmApi + ?Sized>(
    api: &A,
    kind: ReportKind,
    selection: &FilterSelection,
) -> std::result::Result<Vec<Record>, String> {
    if !selection.has_years() {
        return Err(MISSING_YEARS_MESSAGE.to_string());
    }
    into_records(api.report(kind, selection).await, kind.empty_message())
}

/// Fetches a comparison into `view`.
///
/// Without a year the error is shown and no request is sent.
#[instrument(skip(api, report, view), fields(api = api.name()))]
pub async fn fetch_comparison<A: FarmApi + ?Sized>(
    api: &A,
    kind: ComparisonKind,
    year: Option<Year>,
    report: &str,
    view: &mut SectionView,
) {
    let Some(year) = year.filter(|y| *y != 0) else {
        debug!("No year selected, request not sent");
        view.show_error(MISSING_YEAR_MESSAGE);
        return;
    };

    view.show_loading(true);
    view.hide_error();
    let request = CompareRequest::new(year, report);
    let result = api.compare(kind, &request).await;
    apply_records(view, into_records(result, EMPTY_COMPARISON_MESSAGE));
    view.show_loading(false);
}

/// Fetches a variable across a range of years.
///
/// A blank variable is rejected before any request is sent.
#[instrument(skip(api, request), fields(api = api.name(), variable = %request.variable))]
pub async fn fetch_trend<A: FarmApi + ?Sized>(
    api: &A,
    request: &TrendRequest,
) -> std::result::Result<Vec<Record>, String> {
    if !request.has_variable() {
        debug!("No variable named, request not sent");
        return Err(MISSING_VARIABLE_MESSAGE.to_string());
    }
    into_records(api.trend(request).await, EMPTY_QUERY_MESSAGE)
}

/// Runs a custom query. It must name a report or a variable.
#[instrument(skip(api, query), fields(api = api.name()))]
pub async fn fetch_query<A: FarmApi + ?Sized>(
    api: &A,
    query: &CustomQuery,
) -> std::result::Result<Vec<Record>, String> {
    if !query.has_subject() {
        debug!("Neither report nor variable named, request not sent");
        return Err(MISSING_SUBJECT_MESSAGE.to_string());
    }
    into_records(api.custom_query(query).await, EMPTY_QUERY_MESSAGE)
}

/// Fetches a metadata listing.
#[instrument(skip(api), fields(api = api.name()))]
pub async fn fetch_metadata<A: FarmApi + ?Sized>(
    api: &A,
    kind: MetadataKind,
    report: Option<&str>,
) -> std::result::Result<Vec<Record>, String> {
    into_records(api.metadata(kind, report).await, EMPTY_QUERY_MESSAGE)
}

fn into_records(
    result: Result<ApiOutcome>,
    empty_message: &str,
) -> std::result::Result<Vec<Record>, String> {
    match result {
        Ok(ApiOutcome::Data(records)) => Ok(records),
        Ok(ApiOutcome::Empty) => Err(empty_message.to_string()),
        Ok(ApiOutcome::Error(message)) => {
            warn!(%message, "Backend reported an error");
            Err(message)
        }
        Err(e) => {
            warn!(error = %e, "Request failed");
            Err(format!("{FETCH_FAILED_PREFIX}{e}"))
        }
    }
}

fn apply_records(view: &mut SectionView, records: std::result::Result<Vec<Record>, String>) {
    match records {
        Ok(records) => view.display_table(&records),
        Err(message) => view.show_error(message),
    }
}
