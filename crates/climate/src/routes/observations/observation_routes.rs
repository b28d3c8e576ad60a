use axum::extract::State;
use std::{collections::BTreeMap, sync::Arc};

use crate::{
    group_precipitation, group_temperature, precipitation_list, station_list, ApiResponse,
    AppState, ErrorBody, PrecipitationReading, QueryError, StationSummary,
};

#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    responses(
        (status = OK, description = "Stations that have observations, ordered by id", content_type = "application/json", body = Vec<StationSummary>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query stations", body = ErrorBody)
    ))]
pub async fn get_stations(State(state): State<Arc<AppState>>) -> Result<ApiResponse, QueryError> {
    let stations = state.engine.stations_with_coordinates().await?;
    Ok(ApiResponse::Stations(station_list(stations)))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    responses(
        (status = OK, description = "Precipitation keyed by date then station for the 365 days ending at the last date on record; readings may be null", content_type = "application/json", body = BTreeMap<String, BTreeMap<String, Option<f64>>>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query precipitation", body = ErrorBody)
    ))]
pub async fn precipitation(State(state): State<Arc<AppState>>) -> Result<ApiResponse, QueryError> {
    let observations = state.engine.recent_precipitation().await?;
    Ok(ApiResponse::PrecipitationByDate(group_precipitation(
        observations,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation/all",
    responses(
        (status = OK, description = "Every precipitation reading on record", content_type = "application/json", body = Vec<PrecipitationReading>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query precipitation", body = ErrorBody)
    ))]
pub async fn all_precipitation(
    State(state): State<Arc<AppState>>,
) -> Result<ApiResponse, QueryError> {
    let observations = state.engine.precipitation_series(None).await?;
    Ok(ApiResponse::PrecipitationList(precipitation_list(
        observations,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    responses(
        (status = OK, description = "Observed temperature keyed by date then station for the 365 days ending at the last date on record", content_type = "application/json", body = BTreeMap<String, BTreeMap<String, f64>>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query temperatures", body = ErrorBody)
    ))]
pub async fn tobs(State(state): State<Arc<AppState>>) -> Result<ApiResponse, QueryError> {
    let observations = state.engine.temperature_series().await?;
    Ok(ApiResponse::TemperatureByDate(group_temperature(
        observations,
    )))
}
