use time::{macros::format_description, Date};

use crate::DateDomain;

/// Which user supplied date failed, so the message can name the right bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRole {
    Start,
    End,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("A start date is required. Try a date on or after {earliest}.")]
    MissingParameter { earliest: String },
    #[error("{}", invalid_date_message(.date, .role, .earliest, .latest))]
    InvalidDate {
        date: String,
        role: DateRole,
        earliest: String,
        latest: String,
    },
    #[error("Your vacation cannot end before it starts. Pick another end date.")]
    InvalidRange { start: String, end: String },
}

fn invalid_date_message(date: &str, role: &DateRole, earliest: &str, latest: &str) -> String {
    let well_formed = Date::parse(date, format_description!("[year]-[month]-[day]")).is_ok();

    if well_formed && date > latest {
        format!(
            "You need to select a valid date. {} is past the last day on record; it has to be on or before {}.",
            date, latest
        )
    } else if well_formed && date < earliest {
        format!(
            "You need to select a valid date. {} precedes the first day on record; it has to be on or after {}.",
            date, earliest
        )
    } else {
        let bound = match role {
            DateRole::Start => format!("on or after {}", earliest),
            DateRole::End => format!("on or before {}", latest),
        };
        format!(
            "You need to select a valid date. {} has no observations on record; it has to be {}.",
            date, bound
        )
    }
}

/// A closed date range whose ends both exist in the dataset, `start <= end`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

/// Gates user supplied dates before they reach any query
///
/// A date is valid only if the dataset holds at least one observation for
/// it; a well-formed date with no observations is rejected the same way as a
/// malformed string.
pub struct DateValidator<'a> {
    domain: &'a DateDomain,
}

impl<'a> DateValidator<'a> {
    pub fn new(domain: &'a DateDomain) -> Self {
        Self { domain }
    }

    pub fn validate_single(&self, date: &str) -> Result<String, ValidationError> {
        self.check(date, DateRole::Start)
    }

    pub fn validate_range(
        &self,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<DateRange, ValidationError> {
        let Some(start) = start else {
            return Err(ValidationError::MissingParameter {
                earliest: self.domain.earliest().to_string(),
            });
        };
        let start = self.check(start, DateRole::Start)?;

        let end = match end {
            Some(end) => self.check(end, DateRole::End)?,
            None => self.domain.latest().to_string(),
        };

        if end < start {
            return Err(ValidationError::InvalidRange { start, end });
        }

        Ok(DateRange { start, end })
    }

    fn check(&self, date: &str, role: DateRole) -> Result<String, ValidationError> {
        if self.domain.contains(date) {
            Ok(date.to_string())
        } else {
            Err(ValidationError::InvalidDate {
                date: date.to_string(),
                role,
                earliest: self.domain.earliest().to_string(),
                latest: self.domain.latest().to_string(),
            })
        }
    }
}
