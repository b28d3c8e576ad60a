use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::ops::Bound;
use utoipa::ToSchema;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("Failed to query sqlite: {0}")]
    Query(#[from] sqlx::Error),
    #[error("Observation database not found: {0}")]
    NotFound(String),
}

/// One station's reading for one day (`measurement` table)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Observation {
    /// ISO 8601 calendar date, "YYYY-MM-DD"
    pub date: String,
    pub station: String,
    /// Precipitation in inches, absent on days the gauge was not read
    pub precipitation: Option<f64>,
    /// Observed temperature in degrees Fahrenheit
    pub temperature: f64,
}

/// Station metadata (`station` table)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Station {
    pub station: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Precipitation,
    Temperature,
}

impl Field {
    pub fn column(&self) -> &'static str {
        match self {
            Field::Precipitation => "prcp",
            Field::Temperature => "tobs",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AggregateOp {
    Min,
    Avg,
    Max,
}

impl AggregateOp {
    pub fn function(&self) -> &'static str {
        match self {
            AggregateOp::Min => "MIN",
            AggregateOp::Avg => "AVG",
            AggregateOp::Max => "MAX",
        }
    }
}

/// Row predicate over observation date and station
///
/// Dates compare as ISO 8601 strings, which orders them chronologically.
#[derive(Clone, Debug, PartialEq)]
pub struct ObservationFilter {
    pub lower: Bound<String>,
    pub upper: Bound<String>,
    /// Empty means every station
    pub station_ids: Vec<String>,
}

impl Default for ObservationFilter {
    fn default() -> Self {
        Self {
            lower: Bound::Unbounded,
            upper: Bound::Unbounded,
            station_ids: Vec::new(),
        }
    }
}

impl ObservationFilter {
    pub fn all() -> Self {
        Self::default()
    }

    /// `date > cutoff`
    pub fn after(cutoff: impl Into<String>) -> Self {
        Self {
            lower: Bound::Excluded(cutoff.into()),
            ..Self::default()
        }
    }

    /// `date >= start`, no upper bound
    pub fn starting_at(start: impl Into<String>) -> Self {
        Self {
            lower: Bound::Included(start.into()),
            ..Self::default()
        }
    }

    /// `start <= date <= end`
    pub fn between(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            lower: Bound::Included(start.into()),
            upper: Bound::Included(end.into()),
            ..Self::default()
        }
    }

    pub fn for_stations(mut self, station_ids: Vec<String>) -> Self {
        self.station_ids = station_ids;
        self
    }

    pub fn matches(&self, observation: &Observation) -> bool {
        let date = observation.date.as_str();
        let above = match &self.lower {
            Bound::Included(start) => date >= start.as_str(),
            Bound::Excluded(start) => date > start.as_str(),
            Bound::Unbounded => true,
        };
        let below = match &self.upper {
            Bound::Included(end) => date <= end.as_str(),
            Bound::Excluded(end) => date < end.as_str(),
            Bound::Unbounded => true,
        };
        let station = self.station_ids.is_empty() || self.station_ids.contains(&observation.station);

        above && below && station
    }
}

/// Read-only access to the observation and station collections
#[async_trait]
pub trait ObservationStore: Sync + Send {
    /// The date of every observation row, duplicates included
    async fn all_dates(&self) -> Result<Vec<String>, StoreError>;
    /// Rows matching the filter, ordered by date
    async fn observations(
        &self,
        filter: &ObservationFilter,
    ) -> Result<Vec<Observation>, StoreError>;
    /// Aggregate over the non-null values of `field`; `None` when no value qualifies
    async fn aggregate(
        &self,
        field: Field,
        op: AggregateOp,
        filter: &ObservationFilter,
    ) -> Result<Option<f64>, StoreError>;
    async fn stations(&self) -> Result<Vec<Station>, StoreError>;
    /// Distinct station ids referenced by at least one observation
    async fn observed_stations(&self) -> Result<Vec<String>, StoreError>;
}
