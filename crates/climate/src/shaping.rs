//! Builds the payload for each endpoint from engine output. Pure, no I/O.

use axum::{response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::{Observation, Station, SummaryStats};

/// `date -> station -> value`
pub type DateGrouped<V> = BTreeMap<String, BTreeMap<String, V>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PrecipitationReading {
    pub date: String,
    pub precipitation: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StationSummary {
    pub id: String,
    pub name: String,
    pub elevation: f64,
    pub lat: f64,
    pub lng: f64,
}

/// Flat summary for a date range; statistics are null when the range holds
/// no qualifying observations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SummaryRecord {
    pub date_01: String,
    pub date_02: String,
    #[serde(rename = "tempF_min")]
    pub temp_f_min: Option<f64>,
    #[serde(rename = "tempF_avg")]
    pub temp_f_avg: Option<f64>,
    #[serde(rename = "tempF_max")]
    pub temp_f_max: Option<f64>,
    pub precipitation_min: Option<f64>,
    pub precipitation_avg: Option<f64>,
    pub precipitation_max: Option<f64>,
}

impl SummaryRecord {
    pub fn from_stats(start: &str, end: &str, stats: &SummaryStats) -> Self {
        Self {
            date_01: start.to_string(),
            date_02: end.to_string(),
            temp_f_min: Some(stats.temp_min),
            temp_f_avg: Some(stats.temp_avg),
            temp_f_max: Some(stats.temp_max),
            precipitation_min: stats.precip_min,
            precipitation_avg: stats.precip_avg,
            precipitation_max: stats.precip_max,
        }
    }

    pub fn empty(start: &str, end: &str) -> Self {
        Self {
            date_01: start.to_string(),
            date_02: end.to_string(),
            temp_f_min: None,
            temp_f_avg: None,
            temp_f_max: None,
            precipitation_min: None,
            precipitation_avg: None,
            precipitation_max: None,
        }
    }
}

/// One variant per response shape; handlers pick a variant and never build
/// JSON by hand
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ApiResponse {
    PrecipitationByDate(DateGrouped<Option<f64>>),
    TemperatureByDate(DateGrouped<f64>),
    Stations(Vec<StationSummary>),
    PrecipitationList(Vec<PrecipitationReading>),
    Summary(SummaryRecord),
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> axum::response::Response {
        Json(self).into_response()
    }
}

/// Later observations for the same (date, station) replace earlier ones
pub fn group_by_date<V, F>(observations: impl IntoIterator<Item = Observation>, value: F) -> DateGrouped<V>
where
    F: Fn(&Observation) -> V,
{
    let mut grouped: DateGrouped<V> = BTreeMap::new();
    for observation in observations {
        let reading = value(&observation);
        grouped
            .entry(observation.date)
            .or_default()
            .insert(observation.station, reading);
    }
    grouped
}

pub fn group_precipitation(
    observations: impl IntoIterator<Item = Observation>,
) -> DateGrouped<Option<f64>> {
    group_by_date(observations, |o| o.precipitation)
}

pub fn group_temperature(observations: impl IntoIterator<Item = Observation>) -> DateGrouped<f64> {
    group_by_date(observations, |o| o.temperature)
}

/// Back to `(date, station, value)` triples, ordered by date then station
pub fn flatten<V: Clone>(grouped: &DateGrouped<V>) -> Vec<(String, String, V)> {
    grouped
        .iter()
        .flat_map(|(date, stations)| {
            stations
                .iter()
                .map(move |(station, value)| (date.clone(), station.clone(), value.clone()))
        })
        .collect()
}

/// One entry per observation, in the order the store returned them
pub fn precipitation_list(
    observations: impl IntoIterator<Item = Observation>,
) -> Vec<PrecipitationReading> {
    observations
        .into_iter()
        .map(|o| PrecipitationReading {
            date: o.date,
            precipitation: o.precipitation,
        })
        .collect()
}

pub fn station_list(stations: impl IntoIterator<Item = Station>) -> Vec<StationSummary> {
    stations
        .into_iter()
        .map(|s| StationSummary {
            id: s.station,
            name: s.name,
            elevation: s.elevation,
            lat: s.latitude,
            lng: s.longitude,
        })
        .collect()
}
