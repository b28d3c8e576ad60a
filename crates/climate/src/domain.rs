use itertools::{Itertools, MinMaxResult};
use log::info;
use std::collections::HashSet;

use crate::ObservationStore;

#[derive(thiserror::Error, Debug)]
pub enum DomainError {
    #[error("Observation data unavailable: {0}")]
    DataUnavailable(String),
}

/// The set of dates with at least one observation, and its bounds
///
/// Built once before the server accepts requests and never mutated; picking up
/// new data means building a new instance.
#[derive(Debug, Clone)]
pub struct DateDomain {
    earliest: String,
    latest: String,
    valid_dates: HashSet<String>,
}

impl DateDomain {
    pub async fn initialize(store: &dyn ObservationStore) -> Result<Self, DomainError> {
        let dates = store
            .all_dates()
            .await
            .map_err(|e| DomainError::DataUnavailable(e.to_string()))?;

        let domain = Self::from_dates(dates)?;
        info!(
            "date domain ready: {} dates from {} to {}",
            domain.valid_dates.len(),
            domain.earliest,
            domain.latest
        );
        Ok(domain)
    }

    /// Zero-padded "YYYY-MM-DD" strings sort chronologically, so min/max by
    /// string order gives the calendar bounds.
    pub fn from_dates<I>(dates: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = String>,
    {
        let valid_dates: HashSet<String> = dates.into_iter().collect();

        let (earliest, latest) = match valid_dates.iter().minmax() {
            MinMaxResult::NoElements => {
                return Err(DomainError::DataUnavailable(String::from(
                    "no observations on record",
                )))
            }
            MinMaxResult::OneElement(date) => (date.clone(), date.clone()),
            MinMaxResult::MinMax(min, max) => (min.clone(), max.clone()),
        };

        Ok(Self {
            earliest,
            latest,
            valid_dates,
        })
    }

    pub fn contains(&self, date: &str) -> bool {
        self.valid_dates.contains(date)
    }

    pub fn earliest(&self) -> &str {
        &self.earliest
    }

    pub fn latest(&self) -> &str {
        &self.latest
    }

    pub fn len(&self) -> usize {
        self.valid_dates.len()
    }

    /// Always false for a constructed domain
    pub fn is_empty(&self) -> bool {
        self.valid_dates.is_empty()
    }
}
