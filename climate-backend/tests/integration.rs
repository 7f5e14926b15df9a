use std::net::TcpListener;

use camino::Utf8PathBuf;
use climate_backend::{
    config::Config,
    db::{self, DbConnection, seed_data::SeedData},
    server,
};
use diesel_async::AsyncConnection;
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::{Value, json};

fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

#[tokio::test]
async fn prod_api() {
    let db_dir = tempfile::tempdir().unwrap();
    let db_path = Utf8PathBuf::from_path_buf(db_dir.path().join("hawaii.sqlite")).unwrap();

    db::run_migrations(&db_path).await.unwrap();
    let mut db_conn = DbConnection::establish(db_path.as_str()).await.unwrap();
    SeedData::sample().write(&mut db_conn).await.unwrap();
    drop(db_conn);

    let config = json!({
        "db_url": db_path.as_str(),
        "host": "127.0.0.1",
        "port": free_port(),
        "query_timeout_secs": 5
    });
    let config: Config = serde_json::from_value(config).unwrap();
    let app_address = format!("http://{}", config.app_address());
    let server_handle = tokio::spawn(server::serve(config, None));

    let client = reqwest::Client::new();

    tokio::time::sleep(tokio::time::Duration::from_secs(1)).await;

    let response = client
        .get(format!("{app_address}/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let index = client
        .get(&app_address)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(index.contains("/api/v1.0/{start}/{end}"));

    let stations: Value = client
        .get(format!("{app_address}/api/v1.0/stations"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        stations,
        json!(["USC00519397", "USC00513117", "USC00519281"])
    );

    let precipitation: Vec<Value> = client
        .get(format!("{app_address}/api/v1.0/precipitation"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        precipitation.len(),
        SeedData::sample().measurements.len()
    );

    let tobs: Vec<Value> = client
        .get(format!("{app_address}/api/v1.0/tobs"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(tobs.len(), 366);
    assert_eq!(tobs.first().unwrap()["date"], "2016-08-23");
    assert_eq!(tobs.last().unwrap()["date"], "2017-08-23");

    let summary: Value = client
        .get(format!("{app_address}/api/v1.0/2017-01-01/2017-06-30"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let (min, avg, max) = (
        summary["TMIN"].as_f64().unwrap(),
        summary["TAVG"].as_f64().unwrap(),
        summary["TMAX"].as_f64().unwrap(),
    );
    assert!(min <= avg && avg <= max);

    let response = client
        .get(format!("{app_address}/api/v1.0/2016-08-24/2016-08-20"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: Value = response.json().await.unwrap();
    assert_eq!(error["error"], "validation_error");

    let response = client
        .get(format!("{app_address}/api/v1.0/2020-01-01"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    server_handle.abort();
}
