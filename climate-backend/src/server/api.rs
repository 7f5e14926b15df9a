use axum::{Router, routing::get};
use climate_core::model::{
    Endpoint,
    precipitation::PrecipitationObservation,
    station::StationCode,
    temperature::{TemperatureObservation, TemperatureSummary},
};

use crate::server::api::handler::{
    fetch_all, index, most_active_station_temperatures, no_route, temperature_summary,
};

use super::AppState;

mod error;
mod handler;

pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route(
            &PrecipitationObservation::endpoint(),
            get(fetch_all::<PrecipitationObservation>),
        )
        .route(&StationCode::endpoint(), get(fetch_all::<StationCode>))
        .route(
            &TemperatureObservation::endpoint(),
            get(most_active_station_temperatures),
        )
        .route(&TemperatureSummary::endpoint(), get(temperature_summary))
        .route(
            &TemperatureSummary::bounded_endpoint(),
            get(temperature_summary),
        )
        .fallback(no_route)
}
