pub mod date_range;
pub mod precipitation;
pub mod station;
pub mod temperature;

pub use date_range::DateRange;

pub const API_PREFIX: &str = "/api/v1.0";

pub trait Endpoint {
    fn endpoint() -> String;
}

/// Every API route paired with a short description, in the order they are advertised.
#[must_use]
pub fn api_routes() -> Vec<(&'static str, String)> {
    use precipitation::PrecipitationObservation;
    use station::StationCode;
    use temperature::{TemperatureObservation, TemperatureSummary};

    vec![
        ("Precipitation", PrecipitationObservation::endpoint()),
        ("List of stations", StationCode::endpoint()),
        (
            "Temperature observations (TOBS) of the most active station over its last year of data",
            TemperatureObservation::endpoint(),
        ),
        (
            "Temperature summary from a start date (yyyy-mm-dd)",
            TemperatureSummary::endpoint(),
        ),
        (
            "Temperature summary between a start and an end date, inclusive (yyyy-mm-dd)",
            TemperatureSummary::bounded_endpoint(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::api_routes;

    #[test]
    fn routes_are_unique_and_prefixed() {
        let paths: Vec<String> = api_routes().into_iter().map(|(_, path)| path).collect();

        assert_eq!(
            paths,
            [
                "/api/v1.0/precipitation",
                "/api/v1.0/stations",
                "/api/v1.0/tobs",
                "/api/v1.0/{start}",
                "/api/v1.0/{start}/{end}",
            ]
        );
    }
}
