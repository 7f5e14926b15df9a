use std::fs;

use anyhow::Context;
use camino::Utf8Path;
use chrono::{Datelike, Days, NaiveDate};
use diesel::prelude::*;
use diesel_async::{AsyncConnection, RunQueryDsl, scoped_futures::ScopedFutureExt};
use serde::{Deserialize, Serialize};

use super::{
    DbConnection, error,
    schema::{measurement, station},
};

#[derive(Insertable, Deserialize, Serialize, Clone, Debug, PartialEq)]
#[diesel(table_name = station, treat_none_as_null = true)]
pub struct NewStation {
    #[serde(rename = "station")]
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub elevation: Option<f64>,
}

#[derive(Insertable, Deserialize, Serialize, Clone, Debug, PartialEq)]
#[diesel(table_name = measurement, treat_none_as_null = true)]
pub struct NewMeasurement {
    pub station: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub prcp: Option<f64>,
    #[serde(default)]
    pub tobs: Option<f64>,
}

/// Rows written into a freshly migrated database for dev mode and tests.
#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct SeedData {
    pub stations: Vec<NewStation>,
    pub measurements: Vec<NewMeasurement>,
}

impl SeedData {
    /// # Errors
    pub fn from_path(path: &Utf8Path) -> anyhow::Result<Self> {
        let contents =
            fs::read_to_string(path).context(format!("failed to read seed data at {path}"))?;

        serde_json::from_str(&contents).context(format!("failed to parse seed data at {path}"))
    }

    /// A deterministic stand-in for the Hawaii dataset: three stations with daily observations
    /// of differing density, ending on 2017-08-23.
    #[must_use]
    pub fn sample() -> Self {
        const LAST_DAY: (i32, u32, u32) = (2017, 8, 23);
        const N_DAYS: u32 = 600;

        let stations = [
            ("USC00519397", "WAIKIKI 717.2, HI US", 21.2716, -157.8168, 3.0),
            ("USC00513117", "KANEOHE 838.1, HI US", 21.4234, -157.8015, 14.6),
            ("USC00519281", "WAIHEE 837.5, HI US", 21.45167, -157.84889, 32.9),
        ];
        // Every n-th day is recorded, so the last station is the most active one
        let recording_interval = [3_u32, 2, 1];

        let (year, month, day) = LAST_DAY;
        let last_day = NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN);

        let mut measurements = Vec::new();
        for offset in (0..N_DAYS).rev() {
            let Some(date) = last_day.checked_sub_days(Days::new(u64::from(offset))) else {
                continue;
            };

            for ((code, ..), interval) in stations.iter().zip(recording_interval) {
                if offset % interval != 0 {
                    continue;
                }

                measurements.push(NewMeasurement {
                    station: (*code).to_string(),
                    date,
                    prcp: sample_precipitation(offset),
                    tobs: Some(sample_temperature(date, interval)),
                });
            }
        }

        let stations = stations
            .into_iter()
            .map(|(code, name, latitude, longitude, elevation)| NewStation {
                code: code.to_string(),
                name: name.to_string(),
                latitude: Some(latitude),
                longitude: Some(longitude),
                elevation: Some(elevation),
            })
            .collect();

        Self {
            stations,
            measurements,
        }
    }

    /// Insert every station and measurement in a single transaction.
    ///
    /// # Errors
    pub async fn write(&self, db_conn: &mut DbConnection) -> error::Result<()> {
        let Self {
            stations,
            measurements,
        } = self;

        db_conn
            .transaction(|conn| {
                async move {
                    for new_station in stations {
                        diesel::insert_into(station::table)
                            .values(new_station)
                            .execute(conn)
                            .await?;
                    }

                    for new_measurement in measurements {
                        diesel::insert_into(measurement::table)
                            .values(new_measurement)
                            .execute(conn)
                            .await?;
                    }

                    Ok::<_, error::Error>(())
                }
                .scope_boxed()
            })
            .await?;

        tracing::debug!(
            n_stations = stations.len(),
            n_measurements = measurements.len(),
            "wrote seed data"
        );

        Ok(())
    }
}

// Warm, dry summers and cooler winters, offset slightly per station
fn sample_temperature(date: NaiveDate, station_offset: u32) -> f64 {
    let day_of_year = f64::from(date.ordinal0());
    let seasonal = (day_of_year / 365.0 * std::f64::consts::TAU).sin();

    (73.0 + 5.0 * seasonal - f64::from(station_offset)).round()
}

fn sample_precipitation(offset: u32) -> Option<f64> {
    match offset % 11 {
        0 => None,
        n if n % 4 == 0 => Some(f64::from(n) / 10.0),
        _ => Some(0.0),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn sample_stations_have_distinct_activity() {
        let SeedData {
            stations,
            measurements,
        } = SeedData::sample();

        let counts: Vec<usize> = stations
            .iter()
            .map(|s| measurements.iter().filter(|m| m.station == s.code).count())
            .collect();

        assert_eq!(counts, [200, 300, 600]);
    }

    #[test]
    fn seed_data_json_uses_dataset_column_names() {
        let seed_data: SeedData = serde_json::from_value(serde_json::json!({
            "stations": [{"station": "USC00519281", "name": "WAIHEE 837.5, HI US"}],
            "measurements": [{"station": "USC00519281", "date": "2016-08-23", "tobs": 77.0}]
        }))
        .unwrap();

        assert_eq!(seed_data.stations[0].code, "USC00519281");
        assert_eq!(seed_data.stations[0].latitude, None);
        assert_eq!(seed_data.measurements[0].prcp, None);
        assert_eq!(seed_data.measurements[0].tobs, Some(77.0));
    }
}
