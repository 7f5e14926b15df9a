use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{API_PREFIX, Endpoint};

/// One measurement row reduced to its date and precipitation. Rows are never merged, so two
/// stations reporting on the same day yield two observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecipitationObservation {
    pub date: NaiveDate,
    pub prcp: Option<f64>,
}

impl Endpoint for PrecipitationObservation {
    fn endpoint() -> String {
        format!("{API_PREFIX}/precipitation")
    }
}
