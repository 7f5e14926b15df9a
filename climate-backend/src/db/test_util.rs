use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::NaiveDate;
use diesel_async::AsyncConnection;
use rstest::fixture;
use tempfile::TempDir;

use super::{
    DbConnection, Store, run_migrations,
    seed_data::{NewMeasurement, NewStation, SeedData},
};

pub struct TestDb {
    _dir: TempDir,
    path: Utf8PathBuf,
    store: Store,
}

impl TestDb {
    pub async fn new(seed_data: &SeedData) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("climate.sqlite")).unwrap();

        run_migrations(&path).await.unwrap();

        let mut db_conn = DbConnection::establish(path.as_str()).await.unwrap();
        seed_data.write(&mut db_conn).await.unwrap();
        drop(db_conn);

        let store = Store::open(path.as_str(), Duration::from_secs(10))
            .await
            .unwrap();

        Self {
            _dir: dir,
            path,
            store,
        }
    }

    pub fn store(&self) -> Store {
        self.store.clone()
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub async fn db_conn(&self) -> DbConnection {
        DbConnection::establish(self.path.as_str())
            .await
            .unwrap_or_else(|_| panic!("failed to connect to test database at {}", self.path))
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn new_station(code: &str, name: &str) -> NewStation {
    NewStation {
        code: code.to_string(),
        name: name.to_string(),
        latitude: None,
        longitude: None,
        elevation: None,
    }
}

fn new_measurement(station: &str, day: &str, prcp: Option<f64>, tobs: Option<f64>) -> NewMeasurement {
    NewMeasurement {
        station: station.to_string(),
        date: date(day),
        prcp,
        tobs,
    }
}

/// Two stations tied on four rows each, a third with two, shared dates across stations, and
/// one row just outside the most active station's last year.
pub fn hawaii_sample() -> SeedData {
    const WAIKIKI: &str = "USC00519397";
    const KANEOHE: &str = "USC00513117";
    const WAIHEE: &str = "USC00519281";

    SeedData {
        stations: vec![
            new_station(WAIKIKI, "WAIKIKI 717.2, HI US"),
            new_station(KANEOHE, "KANEOHE 838.1, HI US"),
            new_station(WAIHEE, "WAIHEE 837.5, HI US"),
        ],
        measurements: vec![
            new_measurement(WAIKIKI, "2017-08-20", Some(0.0), Some(75.0)),
            new_measurement(WAIHEE, "2016-08-22", Some(0.1), Some(60.0)),
            new_measurement(WAIHEE, "2016-08-23", Some(0.2), Some(70.0)),
            new_measurement(KANEOHE, "2016-08-23", Some(0.5), Some(71.0)),
            new_measurement(WAIKIKI, "2017-08-21", None, Some(76.0)),
            new_measurement(WAIHEE, "2017-01-15", Some(0.0), None),
            new_measurement(WAIKIKI, "2017-08-22", Some(0.3), Some(77.0)),
            new_measurement(WAIHEE, "2017-08-23", Some(0.0), Some(80.0)),
            new_measurement(WAIKIKI, "2017-08-23", Some(0.1), Some(78.0)),
            new_measurement(KANEOHE, "2017-08-23", None, None),
        ],
    }
}

/// A single station with three observations around 2016-08-23.
pub fn example_rows() -> SeedData {
    const S1: &str = "S1";

    SeedData {
        stations: vec![new_station(S1, "EXAMPLE STATION")],
        measurements: vec![
            new_measurement(S1, "2016-08-20", Some(0.0), Some(70.0)),
            new_measurement(S1, "2016-08-23", Some(0.1), Some(72.0)),
            new_measurement(S1, "2016-08-24", None, Some(74.0)),
        ],
    }
}

#[fixture]
pub async fn hawaii_db() -> TestDb {
    TestDb::new(&hawaii_sample()).await
}

#[fixture]
pub async fn example_db() -> TestDb {
    TestDb::new(&example_rows()).await
}
