use chrono::NaiveDate;
use climate_core::model::{
    DateRange, precipitation::PrecipitationObservation, station::StationCode,
    temperature::TemperatureObservation,
};
use diesel::{dsl::count_star, prelude::*, sqlite::Sqlite};
use diesel_async::RunQueryDsl;

use crate::db::{
    DbConnection, error,
    schema::measurement,
    util::{BoxedDieselExpression, DieselExpressionBuilder},
};

use super::{AsDieselFilter, FetchAll, FetchByQuery};

#[derive(Queryable, Selectable)]
#[diesel(table_name = measurement, check_for_backend(Sqlite))]
struct PrecipitationRow {
    date: NaiveDate,
    prcp: Option<f64>,
}

impl From<PrecipitationRow> for PrecipitationObservation {
    fn from(PrecipitationRow { date, prcp }: PrecipitationRow) -> Self {
        Self { date, prcp }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = measurement, check_for_backend(Sqlite))]
struct TemperatureRow {
    date: NaiveDate,
    tobs: Option<f64>,
}

impl From<TemperatureRow> for TemperatureObservation {
    fn from(TemperatureRow { date, tobs }: TemperatureRow) -> Self {
        Self { date, tobs }
    }
}

/// Which measurement rows a query covers. Unset fields don't constrain anything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementQuery {
    pub station: Option<StationCode>,
    pub dates: Option<DateRange>,
}

impl MeasurementQuery {
    #[must_use]
    pub fn dates(dates: DateRange) -> Self {
        Self {
            station: None,
            dates: Some(dates),
        }
    }

    /// The last 365 days of data recorded by the most active station, ending at that station's
    /// own latest observation.
    ///
    /// # Errors
    /// Returns [`error::Error::RecordNotFound`] if there are no measurements at all.
    pub async fn most_active_station_last_year(db_conn: &mut DbConnection) -> error::Result<Self> {
        let StationActivity {
            station,
            n_observations,
        } = most_active_station(db_conn).await?;
        let anchor = latest_observation_date(&station, db_conn).await?;
        let dates = DateRange::year_ending(anchor);

        tracing::debug!(%station, n_observations, %dates, "selected most active station");

        Ok(Self {
            station: Some(station),
            dates: Some(dates),
        })
    }
}

impl AsDieselFilter<measurement::table> for MeasurementQuery {
    fn as_diesel_filter<'a>(&'a self) -> Option<BoxedDieselExpression<'a, measurement::table>>
    where
        measurement::table: 'a,
    {
        let Self { station, dates } = self;

        let mut query = DieselExpressionBuilder::default();

        if let Some(station) = station {
            query = query.and(measurement::station.eq(station.as_str()));
        }

        if let Some(dates) = dates {
            query = query.and(measurement::date.ge(dates.start()));

            if let Some(end) = dates.end() {
                query = query.and(measurement::date.le(end));
            }
        }

        query.build()
    }
}

impl FetchAll for PrecipitationObservation {
    async fn fetch_all(db_conn: &mut DbConnection) -> error::Result<Vec<Self>> {
        let rows: Vec<PrecipitationRow> = measurement::table
            .select(PrecipitationRow::as_select())
            .order_by(measurement::id)
            .load(db_conn)
            .await?;

        Ok(rows.into_iter().map(Self::from).collect())
    }
}

impl FetchByQuery for TemperatureObservation {
    type QueryParams = MeasurementQuery;

    async fn fetch_by_query(
        query: &Self::QueryParams,
        db_conn: &mut DbConnection,
    ) -> error::Result<Vec<Self>> {
        let mut statement = measurement::table
            .select(TemperatureRow::as_select())
            .order_by((measurement::date, measurement::id))
            .into_boxed();

        if let Some(filter) = query.as_diesel_filter() {
            statement = statement.filter(filter);
        }

        let rows: Vec<TemperatureRow> = statement.load(db_conn).await?;

        Ok(rows.into_iter().map(Self::from).collect())
    }
}

/// Every recorded (non-null) temperature matching `query`.
///
/// # Errors
pub async fn temperatures(
    query: &MeasurementQuery,
    db_conn: &mut DbConnection,
) -> error::Result<Vec<f64>> {
    let mut statement = measurement::table
        .filter(measurement::tobs.is_not_null())
        .select(measurement::tobs.assume_not_null())
        .into_boxed();

    if let Some(filter) = query.as_diesel_filter() {
        statement = statement.filter(filter);
    }

    Ok(statement.load(db_conn).await?)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationActivity {
    pub station: StationCode,
    pub n_observations: i64,
}

/// The station with the most measurement rows. Ties go to the lexicographically smallest code.
///
/// # Errors
/// Returns [`error::Error::RecordNotFound`] if there are no measurements.
pub async fn most_active_station(db_conn: &mut DbConnection) -> error::Result<StationActivity> {
    let (code, n_observations): (String, i64) = measurement::table
        .group_by(measurement::station)
        .select((measurement::station, count_star()))
        .order_by((count_star().desc(), measurement::station.asc()))
        .first(db_conn)
        .await?;

    Ok(StationActivity {
        station: StationCode(code),
        n_observations,
    })
}

/// # Errors
/// Returns [`error::Error::RecordNotFound`] if `station` has no measurements.
pub async fn latest_observation_date(
    station: &StationCode,
    db_conn: &mut DbConnection,
) -> error::Result<NaiveDate> {
    let latest: Option<NaiveDate> = measurement::table
        .filter(measurement::station.eq(station.as_str()))
        .select(diesel::dsl::max(measurement::date))
        .first(db_conn)
        .await?;

    latest.ok_or(error::Error::RecordNotFound)
}
