use std::{fmt::Display, sync::LazyLock};

use chrono::{Days, NaiveDate};
use regex::Regex;
use serde::Serialize;

const DATE_FORMAT: &str = "%Y-%m-%d";

static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern should compile"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateField {
    Start,
    End,
}

impl Display for DateField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::End => f.write_str("end"),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid `{field}` date {value:?}: expected a calendar date formatted as YYYY-MM-DD")]
    Malformed { field: DateField, value: String },
    #[error("`start` date {start} is after `end` date {end}")]
    Inverted { start: NaiveDate, end: NaiveDate },
}

/// An inclusive range of observation dates. A range without an `end` is open towards the
/// future.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: Option<NaiveDate>,
}

impl DateRange {
    #[must_use]
    pub fn starting(start: NaiveDate) -> Self {
        Self { start, end: None }
    }

    /// # Errors
    /// Returns [`Error::Inverted`] when `start` falls after `end`.
    pub fn bounded(start: NaiveDate, end: NaiveDate) -> Result<Self, Error> {
        if start > end {
            return Err(Error::Inverted { start, end });
        }

        Ok(Self {
            start,
            end: Some(end),
        })
    }

    /// The 365 days leading up to and including `anchor`.
    #[must_use]
    pub fn year_ending(anchor: NaiveDate) -> Self {
        let start = anchor
            .checked_sub_days(Days::new(365))
            .unwrap_or(NaiveDate::MIN);

        Self {
            start,
            end: Some(anchor),
        }
    }

    /// Parse the raw path segments of a temperature summary request.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] naming the offending field, or [`Error::Inverted`].
    pub fn parse(start: &str, end: Option<&str>) -> Result<Self, Error> {
        let start = parse_date(DateField::Start, start)?;

        match end {
            None => Ok(Self::starting(start)),
            Some(end) => Self::bounded(start, parse_date(DateField::End, end)?),
        }
    }

    #[must_use]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        let Self { start, end } = *self;

        date >= start && end.is_none_or(|end| date <= end)
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.end {
            Some(end) => write!(f, "{} to {end}", self.start),
            None => write!(f, "{} onwards", self.start),
        }
    }
}

fn parse_date(field: DateField, value: &str) -> Result<NaiveDate, Error> {
    let malformed = || Error::Malformed {
        field,
        value: value.to_string(),
    };

    if !DATE_PATTERN.is_match(value) {
        return Err(malformed());
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| malformed())
}
