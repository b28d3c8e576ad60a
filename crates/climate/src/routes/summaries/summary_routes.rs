use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use log::warn;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::IntoParams;

use crate::{
    AggregationError, ApiResponse, AppState, DateValidator, ErrorBody, QueryError, SummaryQuery,
    SummaryRecord, UpperBound,
};

#[derive(Clone, Debug, Deserialize, Serialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SummaryParams {
    /// First day of the range, "YYYY-MM-DD"
    pub start: Option<String>,
    /// Last day of the range, defaults to the last day on record
    pub end: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}",
    params(
         ("start" = String, Path, description = "First day of the summary, YYYY-MM-DD; must have observations"),
    ),
    responses(
        (status = OK, description = "Summary from the start date onwards", content_type = "application/json", body = SummaryRecord),
        (status = BAD_REQUEST, description = "Start date has no observations on record", body = ErrorBody),
        (status = NOT_FOUND, description = "No observations in range, statistics are null", body = SummaryRecord),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query observations", body = ErrorBody)
    ))]
pub async fn summary_from(
    State(state): State<Arc<AppState>>,
    Path(start): Path<String>,
) -> Result<(StatusCode, ApiResponse), QueryError> {
    let start = DateValidator::new(&state.domain).validate_single(&start)?;
    summarize(&state, SummaryQuery::open(start)).await
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}/{end}",
    params(
         ("start" = String, Path, description = "First day of the summary, YYYY-MM-DD; must have observations"),
         ("end" = String, Path, description = "Last day of the summary, YYYY-MM-DD; must have observations"),
    ),
    responses(
        (status = OK, description = "Summary between the two dates, inclusive", content_type = "application/json", body = SummaryRecord),
        (status = BAD_REQUEST, description = "A date has no observations on record or the end precedes the start", body = ErrorBody),
        (status = NOT_FOUND, description = "No observations in range, statistics are null", body = SummaryRecord),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query observations", body = ErrorBody)
    ))]
pub async fn summary_between(
    State(state): State<Arc<AppState>>,
    Path((start, end)): Path<(String, String)>,
) -> Result<(StatusCode, ApiResponse), QueryError> {
    let range = DateValidator::new(&state.domain).validate_range(Some(&start), Some(&end))?;
    summarize(&state, SummaryQuery::closed(range)).await
}

#[utoipa::path(
    get,
    path = "/api/v1.0/summary",
    params(SummaryParams),
    responses(
        (status = OK, description = "Summary between the two dates, inclusive", content_type = "application/json", body = SummaryRecord),
        (status = BAD_REQUEST, description = "Start missing, a date has no observations on record, or the end precedes the start", body = ErrorBody),
        (status = NOT_FOUND, description = "No observations in range, statistics are null", body = SummaryRecord),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query observations", body = ErrorBody)
    ))]
pub async fn summary(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SummaryParams>,
) -> Result<(StatusCode, ApiResponse), QueryError> {
    let range = DateValidator::new(&state.domain)
        .validate_range(params.start.as_deref(), params.end.as_deref())?;
    summarize(&state, SummaryQuery::closed(range)).await
}

async fn summarize(
    state: &AppState,
    query: SummaryQuery,
) -> Result<(StatusCode, ApiResponse), QueryError> {
    // open-ended summaries still report the last date on record as their end
    let end = match &query.upper {
        UpperBound::Date(end) => end.clone(),
        UpperBound::Unbounded => state.domain.latest().to_string(),
    };

    match state.engine.summarize(&query, state.rounding).await {
        Ok(stats) => Ok((
            StatusCode::OK,
            ApiResponse::Summary(SummaryRecord::from_stats(&query.start, &end, &stats)),
        )),
        Err(AggregationError::NoDataInRange { .. }) => {
            warn!("no observations from {} to {}", query.start, end);
            Ok((
                StatusCode::NOT_FOUND,
                ApiResponse::Summary(SummaryRecord::empty(&query.start, &end)),
            ))
        }
        Err(err) => Err(err.into()),
    }
}
