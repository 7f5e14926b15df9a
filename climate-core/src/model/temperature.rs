use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{API_PREFIX, Endpoint};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureObservation {
    pub date: NaiveDate,
    pub tobs: Option<f64>,
}

impl Endpoint for TemperatureObservation {
    fn endpoint() -> String {
        format!("{API_PREFIX}/tobs")
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cannot summarize an empty set of temperature observations")]
pub struct EmptyObservations;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSummary {
    #[serde(rename = "TMIN")]
    pub min: f64,
    #[serde(rename = "TAVG")]
    pub avg: f64,
    #[serde(rename = "TMAX")]
    pub max: f64,
}

impl TemperatureSummary {
    /// Minimum, mean and maximum of `temperatures`. The mean is rounded to one decimal place,
    /// halves away from zero, and kept within `[min, max]`.
    ///
    /// # Errors
    /// Returns [`EmptyObservations`] if `temperatures` yields nothing.
    pub fn from_observations(
        temperatures: impl IntoIterator<Item = f64>,
    ) -> Result<Self, EmptyObservations> {
        let mut temperatures = temperatures.into_iter();

        let first = temperatures.next().ok_or(EmptyObservations)?;
        let (mut min, mut max, mut sum, mut count) = (first, first, first, 1_u32);

        for t in temperatures {
            min = min.min(t);
            max = max.max(t);
            sum += t;
            count += 1;
        }

        let avg = round_to_tenth(sum / f64::from(count)).clamp(min, max);

        Ok(Self { min, avg, max })
    }

    /// The route for a summary between a start and an end date.
    #[must_use]
    pub fn bounded_endpoint() -> String {
        format!("{API_PREFIX}/{{start}}/{{end}}")
    }
}

impl Endpoint for TemperatureSummary {
    fn endpoint() -> String {
        format!("{API_PREFIX}/{{start}}")
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
