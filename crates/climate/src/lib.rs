pub mod aggregation;
pub mod db;
pub mod domain;
pub mod error;
pub mod routes;
pub mod shaping;
mod startup;
pub mod templates;
mod utils;
pub mod validation;

pub use aggregation::{
    trailing_cutoff, AggregationEngine, AggregationError, Rounding, SummaryQuery, SummaryStats,
    UpperBound, TRAILING_WINDOW_DAYS,
};
pub use db::{
    AggregateOp, Field, Observation, ObservationFilter, ObservationStore, SqliteStore, Station,
    StoreError,
};
pub use domain::{DateDomain, DomainError};
pub use error::{ErrorBody, QueryError};
pub use routes::*;
pub use shaping::{
    flatten, group_by_date, group_precipitation, group_temperature, precipitation_list,
    station_list, ApiResponse, DateGrouped, PrecipitationReading, StationSummary, SummaryRecord,
};
pub use startup::{app, build_app_state, build_app_state_with_store, AppState};
pub use utils::*;
pub use validation::{DateRange, DateRole, DateValidator, ValidationError};
