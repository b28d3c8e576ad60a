use async_trait::async_trait;
use climate_core::is_file;
use log::{debug, info};
use regex::Regex;
use scooby::postgres::{select, Aliasable, Parameters, Select};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::{ops::Bound, sync::LazyLock, time::Duration};

use super::{AggregateOp, Field, Observation, ObservationFilter, ObservationStore, Station, StoreError};

// scooby renders postgres style `$n` placeholders
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(\d+)").expect("placeholder pattern is valid"));

type ObservationRow = (String, String, Option<f64>, f64);
type StationRow = (String, String, f64, f64, f64);

/// Read-only access to the Hawaii climate SQLite file
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn open(path: &str) -> Result<Self, StoreError> {
        if !is_file(path) {
            return Err(StoreError::NotFound(path.to_string()));
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true)
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "MEMORY");

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await?;

        info!("SQLite observations opened read-only at: {}", path);
        Ok(Self { pool })
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn to_sqlite(select: &Select) -> String {
    let sql = select.to_string();
    PLACEHOLDER.replace_all(&sql, "?").into_owned()
}

fn apply_filter(
    mut query: Select,
    filter: &ObservationFilter,
    placeholders: &mut Parameters,
    values: &mut Vec<String>,
) -> Select {
    match &filter.lower {
        Bound::Included(start) => {
            query = query.where_(format!("date >= {}", placeholders.next()));
            values.push(start.clone());
        }
        Bound::Excluded(start) => {
            query = query.where_(format!("date > {}", placeholders.next()));
            values.push(start.clone());
        }
        Bound::Unbounded => {}
    }

    match &filter.upper {
        Bound::Included(end) => {
            query = query.where_(format!("date <= {}", placeholders.next()));
            values.push(end.clone());
        }
        Bound::Excluded(end) => {
            query = query.where_(format!("date < {}", placeholders.next()));
            values.push(end.clone());
        }
        Bound::Unbounded => {}
    }

    if !filter.station_ids.is_empty() {
        query = query.where_(format!(
            "station IN ({})",
            placeholders.next_n(filter.station_ids.len())
        ));
        values.extend(filter.station_ids.iter().cloned());
    }

    query
}

#[async_trait]
impl ObservationStore for SqliteStore {
    async fn all_dates(&self) -> Result<Vec<String>, StoreError> {
        let dates: Vec<String> = sqlx::query_scalar("SELECT date FROM measurement")
            .fetch_all(&self.pool)
            .await?;
        debug!("loaded {} observation dates", dates.len());
        Ok(dates)
    }

    async fn observations(
        &self,
        filter: &ObservationFilter,
    ) -> Result<Vec<Observation>, StoreError> {
        let mut placeholders = Parameters::new();
        let mut values: Vec<String> = vec![];

        let base_query = select((
            "date",
            "station",
            "CAST(prcp AS REAL)".as_("prcp"),
            "CAST(tobs AS REAL)".as_("tobs"),
        ))
        .from("measurement");
        let query = apply_filter(base_query, filter, &mut placeholders, &mut values);
        let sql = format!("{} ORDER BY date", to_sqlite(&query));
        debug!("observations query: {}", sql);

        let mut statement = sqlx::query_as::<_, ObservationRow>(&sql);
        for value in values {
            statement = statement.bind(value);
        }

        let rows = statement.fetch_all(&self.pool).await?;
        Ok(rows
            .into_iter()
            .map(|(date, station, precipitation, temperature)| Observation {
                date,
                station,
                precipitation,
                temperature,
            })
            .collect())
    }

    async fn aggregate(
        &self,
        field: Field,
        op: AggregateOp,
        filter: &ObservationFilter,
    ) -> Result<Option<f64>, StoreError> {
        let mut placeholders = Parameters::new();
        let mut values: Vec<String> = vec![];

        let base_query = select(
            format!("CAST({}({}) AS REAL)", op.function(), field.column()).as_("value"),
        )
        .from("measurement");
        let query = apply_filter(base_query, filter, &mut placeholders, &mut values);
        let sql = to_sqlite(&query);
        debug!("aggregate query: {}", sql);

        let mut statement = sqlx::query_scalar::<_, Option<f64>>(&sql);
        for value in values {
            statement = statement.bind(value);
        }

        Ok(statement.fetch_one(&self.pool).await?)
    }

    async fn stations(&self) -> Result<Vec<Station>, StoreError> {
        let rows = sqlx::query_as::<_, StationRow>(
            "SELECT station, name,
                    CAST(latitude AS REAL), CAST(longitude AS REAL), CAST(elevation AS REAL)
             FROM station
             ORDER BY station",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(station, name, latitude, longitude, elevation)| Station {
                station,
                name,
                latitude,
                longitude,
                elevation,
            })
            .collect())
    }

    async fn observed_stations(&self) -> Result<Vec<String>, StoreError> {
        let stations: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT station FROM measurement ORDER BY station")
                .fetch_all(&self.pool)
                .await?;
        Ok(stations)
    }
}
