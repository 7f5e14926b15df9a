use std::collections::HashMap;

use axum::{
    Json,
    extract::{FromRequestParts, Path, State},
    http::{Uri, request::Parts},
    response::Html,
};
use climate_core::model::{
    DateRange, api_routes,
    temperature::{TemperatureObservation, TemperatureSummary},
};
use diesel_async::scoped_futures::ScopedFutureExt;
use serde::Serialize;

use crate::{
    db::{
        self,
        model::{
            FetchAll, FetchByQuery,
            measurement::{self, MeasurementQuery},
        },
    },
    server::AppState,
};

use super::error::{Error, Result};

/// The `{start}` and optional `{end}` segments of a temperature summary route, parsed into a
/// [`DateRange`].
pub(super) struct DateRangePath(DateRange);

impl<S> FromRequestParts<S> for DateRangePath
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let Path(segments) = Path::<HashMap<String, String>>::from_request_parts(parts, state).await?;

        let start = segments.get("start").ok_or_else(|| Error::Internal {
            message: "route is missing a `start` segment".to_string(),
        })?;
        let end = segments.get("end").map(String::as_str);

        Ok(Self(DateRange::parse(start, end)?))
    }
}

pub(super) async fn index() -> Html<String> {
    let items: String = api_routes()
        .into_iter()
        .map(|(description, path)| format!("  <li>{description}: <code>{path}</code></li>\n"))
        .collect();

    Html(format!(
        "<h1>Hawaii climate API</h1>\n<p>Available routes:</p>\n<ul>\n{items}</ul>\n"
    ))
}

pub(super) async fn no_route(uri: Uri) -> Error {
    Error::not_found(format!("no route matches {}", uri.path()))
}

pub(super) async fn fetch_all<Resource>(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Resource>>>
where
    Resource: FetchAll + Serialize + Send + 'static,
{
    let items = app_state
        .store()
        .read(|conn| async move { Resource::fetch_all(conn).await }.scope_boxed())
        .await?;

    tracing::debug!(
        resource = std::any::type_name::<Resource>(),
        n_items = items.len(),
        "fetched all rows"
    );

    Ok(Json(items))
}

pub(super) async fn most_active_station_temperatures(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<TemperatureObservation>>> {
    let observations = app_state
        .store()
        .read(|conn| {
            async move {
                let query = MeasurementQuery::most_active_station_last_year(conn).await?;
                tracing::info!(?query, "fetching temperature observations");

                TemperatureObservation::fetch_by_query(&query, conn).await
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| match err {
            db::error::Error::RecordNotFound => {
                Error::not_found("no measurements have been recorded by any station")
            }
            other => Error::from(other),
        })?;

    Ok(Json(observations))
}

pub(super) async fn temperature_summary(
    State(app_state): State<AppState>,
    DateRangePath(dates): DateRangePath,
) -> Result<Json<TemperatureSummary>> {
    tracing::info!(%dates, "summarizing temperatures");

    let query = MeasurementQuery::dates(dates);
    let temperatures = app_state
        .store()
        .read(move |conn| async move { measurement::temperatures(&query, conn).await }.scope_boxed())
        .await?;

    let summary = TemperatureSummary::from_observations(temperatures)
        .map_err(|_| Error::not_found(format!("no temperature observations from {dates}")))?;

    Ok(Json(summary))
}
