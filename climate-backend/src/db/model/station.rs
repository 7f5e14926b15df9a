use climate_core::model::station::StationCode;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::{DbConnection, error, schema::station};

use super::FetchAll;

impl FetchAll for StationCode {
    async fn fetch_all(db_conn: &mut DbConnection) -> error::Result<Vec<Self>> {
        let codes: Vec<String> = station::table
            .select(station::code)
            .order_by(station::id)
            .load(db_conn)
            .await?;

        Ok(codes.into_iter().map(StationCode).collect())
    }
}
