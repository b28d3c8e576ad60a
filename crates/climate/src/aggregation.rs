use itertools::Itertools;
use log::debug;
use std::{collections::HashSet, fmt, str::FromStr, sync::Arc};
use time::{macros::format_description, Date, Duration};

use crate::{
    AggregateOp, DateDomain, DateRange, Field, Observation, ObservationFilter, ObservationStore,
    Station, StoreError,
};

/// Length of the trailing window served by `/tobs` and `/precipitation`.
/// A plain day count: leap years are not special-cased.
pub const TRAILING_WINDOW_DAYS: i64 = 365;

#[derive(thiserror::Error, Debug)]
pub enum AggregationError {
    #[error("No observations recorded from {start} to {end}")]
    NoDataInRange { start: String, end: String },
    #[error("Failed to query observations: {0}")]
    Store(#[from] StoreError),
    #[error("Failed to parse date on record: {0}")]
    DateParse(#[from] time::error::Parse),
    #[error("Failed to format date: {0}")]
    DateFormat(#[from] time::error::Format),
    #[error("Failed to round statistic: {0}")]
    RoundingParse(#[from] std::num::ParseFloatError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpperBound {
    Date(String),
    Unbounded,
}

/// Date bounds for a summary request
///
/// An open-ended query stays open all the way to the store; it is never
/// capped at the latest date known at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryQuery {
    pub start: String,
    pub upper: UpperBound,
}

impl SummaryQuery {
    pub fn closed(range: DateRange) -> Self {
        Self {
            start: range.start,
            upper: UpperBound::Date(range.end),
        }
    }

    pub fn open(start: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            upper: UpperBound::Unbounded,
        }
    }

    pub fn filter(&self) -> ObservationFilter {
        match &self.upper {
            UpperBound::Date(end) => ObservationFilter::between(self.start.clone(), end.clone()),
            UpperBound::Unbounded => ObservationFilter::starting_at(self.start.clone()),
        }
    }
}

/// How summary statistics are reduced before they are returned
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Rounding {
    /// Nearest hundredth of the exact binary value, ties to even
    #[default]
    TwoDecimals,
    /// `int(x)`, drops the fractional part
    Truncate,
}

impl Rounding {
    pub fn apply(&self, value: f64) -> Result<f64, AggregationError> {
        match self {
            // formatting rounds the exact binary value, ties to even
            Rounding::TwoDecimals => Ok(format!("{:.2}", value).parse::<f64>()?),
            Rounding::Truncate => Ok(value.trunc()),
        }
    }
}

impl FromStr for Rounding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "round" | "two_decimals" => Ok(Rounding::TwoDecimals),
            "truncate" | "int" => Ok(Rounding::Truncate),
            other => Err(format!(
                "unknown rounding '{}', expected 'round' or 'truncate'",
                other
            )),
        }
    }
}

impl fmt::Display for Rounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rounding::TwoDecimals => write!(f, "round"),
            Rounding::Truncate => write!(f, "truncate"),
        }
    }
}

/// Min/avg/max over a date range. Precipitation is `None` when every reading
/// in range is null; temperature has no null policy.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStats {
    pub temp_min: f64,
    pub temp_avg: f64,
    pub temp_max: f64,
    pub precip_min: Option<f64>,
    pub precip_avg: Option<f64>,
    pub precip_max: Option<f64>,
}

/// `latest` minus `days`, both as "YYYY-MM-DD"
pub fn trailing_cutoff(latest: &str, days: i64) -> Result<String, AggregationError> {
    let format = format_description!("[year]-[month]-[day]");
    let latest = Date::parse(latest, format)?;
    Ok((latest - Duration::days(days)).format(format)?)
}

pub struct AggregationEngine {
    store: Arc<dyn ObservationStore>,
    cutoff: String,
}

impl AggregationEngine {
    /// The trailing-window cutoff is fixed here from the dataset's latest date,
    /// so the window does not move with wall-clock time.
    pub fn new(
        store: Arc<dyn ObservationStore>,
        domain: &DateDomain,
    ) -> Result<Self, AggregationError> {
        let cutoff = trailing_cutoff(domain.latest(), TRAILING_WINDOW_DAYS)?;
        debug!("trailing window starts after {}", cutoff);
        Ok(Self { store, cutoff })
    }

    /// Observations strictly after this date fall in the trailing window
    pub fn cutoff(&self) -> &str {
        &self.cutoff
    }

    pub async fn summarize(
        &self,
        query: &SummaryQuery,
        rounding: Rounding,
    ) -> Result<SummaryStats, AggregationError> {
        let filter = query.filter();
        let store = self.store.as_ref();

        let (temp_min, temp_avg, temp_max, precip_min, precip_avg, precip_max) = futures::try_join!(
            store.aggregate(Field::Temperature, AggregateOp::Min, &filter),
            store.aggregate(Field::Temperature, AggregateOp::Avg, &filter),
            store.aggregate(Field::Temperature, AggregateOp::Max, &filter),
            store.aggregate(Field::Precipitation, AggregateOp::Min, &filter),
            store.aggregate(Field::Precipitation, AggregateOp::Avg, &filter),
            store.aggregate(Field::Precipitation, AggregateOp::Max, &filter),
        )?;

        let (Some(temp_min), Some(temp_avg), Some(temp_max)) = (temp_min, temp_avg, temp_max)
        else {
            return Err(AggregationError::NoDataInRange {
                start: query.start.clone(),
                end: match &query.upper {
                    UpperBound::Date(end) => end.clone(),
                    UpperBound::Unbounded => String::from("the last day on record"),
                },
            });
        };

        Ok(SummaryStats {
            temp_min: rounding.apply(temp_min)?,
            temp_avg: rounding.apply(temp_avg)?,
            temp_max: rounding.apply(temp_max)?,
            precip_min: precip_min.map(|v| rounding.apply(v)).transpose()?,
            precip_avg: precip_avg.map(|v| rounding.apply(v)).transpose()?,
            precip_max: precip_max.map(|v| rounding.apply(v)).transpose()?,
        })
    }

    /// Every observation, or those inside `query` when given. Null
    /// precipitation readings are kept.
    pub async fn precipitation_series(
        &self,
        query: Option<&SummaryQuery>,
    ) -> Result<Vec<Observation>, AggregationError> {
        let filter = query.map(SummaryQuery::filter).unwrap_or_default();
        Ok(self.store.observations(&filter).await?)
    }

    /// Observations in the trailing window, used for precipitation
    pub async fn recent_precipitation(&self) -> Result<Vec<Observation>, AggregationError> {
        self.trailing_window().await
    }

    /// Observations in the trailing window, used for temperature
    pub async fn temperature_series(&self) -> Result<Vec<Observation>, AggregationError> {
        self.trailing_window().await
    }

    async fn trailing_window(&self) -> Result<Vec<Observation>, AggregationError> {
        let filter = ObservationFilter::after(self.cutoff.clone());
        Ok(self.store.observations(&filter).await?)
    }

    /// Stations that have observations, with their metadata, ordered by id.
    /// Stations without observations and observations of unknown stations
    /// both drop out.
    pub async fn stations_with_coordinates(&self) -> Result<Vec<Station>, AggregationError> {
        let (stations, observed) =
            futures::try_join!(self.store.stations(), self.store.observed_stations())?;
        let observed: HashSet<String> = observed.into_iter().collect();

        Ok(stations
            .into_iter()
            .filter(|station| observed.contains(&station.station))
            .unique_by(|station| station.station.clone())
            .sorted_by(|a, b| a.station.cmp(&b.station))
            .collect())
    }
}
