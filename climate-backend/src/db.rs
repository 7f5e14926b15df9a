use std::{sync::Arc, time::Duration};

use anyhow::Context;
use camino::Utf8Path;
use diesel::{SqliteConnection, prelude::*};
use diesel_async::{
    AsyncConnection, RunQueryDsl,
    scoped_futures::{ScopedBoxFuture, ScopedFutureExt},
    sync_connection_wrapper::SyncConnectionWrapper,
};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

pub mod error;
pub mod model;
pub mod schema;
pub mod seed_data;
mod util;

#[cfg(test)]
pub(crate) mod test_util;

pub type DbConnection = SyncConnectionWrapper<SqliteConnection>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Handle to the climate database. Cloning is cheap; every [`Store::read`] opens its own
/// connection and drops it once the query finishes, whatever the outcome.
#[derive(Clone, Debug)]
pub struct Store {
    db_url: Arc<str>,
    query_timeout: Duration,
}

impl Store {
    /// Check that the database at `db_url` exists and exposes both climate tables. Every
    /// connection made afterwards is read-only and never creates the file.
    ///
    /// # Errors
    /// Returns [`error::Error::Unavailable`] if the file is missing or the tables can't be read.
    pub async fn open(db_url: &str, query_timeout: Duration) -> error::Result<Self> {
        if !db_url.starts_with("file:") && !Utf8Path::new(db_url).is_file() {
            return Err(error::Error::Unavailable {
                message: format!("no database file at {db_url}"),
            });
        }

        let store = Self {
            db_url: Arc::from(read_only_url(db_url)),
            query_timeout,
        };

        let (n_stations, n_measurements) = store
            .read(|db_conn| {
                async move {
                    let n_stations: i64 = schema::station::table.count().get_result(db_conn).await?;
                    let n_measurements: i64 = schema::measurement::table
                        .count()
                        .get_result(db_conn)
                        .await?;

                    Ok::<_, error::Error>((n_stations, n_measurements))
                }
                .scope_boxed()
            })
            .await?;

        tracing::info!(db_url, n_stations, n_measurements, "opened climate database");

        Ok(store)
    }

    /// Run `query` on a fresh connection, bounded by the configured timeout.
    ///
    /// # Errors
    /// Returns [`error::Error::Timeout`] when the bound is exceeded, otherwise whatever
    /// connecting or `query` fails with.
    pub async fn read<'a, T, F>(&self, query: F) -> error::Result<T>
    where
        F: for<'r> FnOnce(&'r mut DbConnection) -> ScopedBoxFuture<'a, 'r, error::Result<T>>
            + Send
            + 'a,
        T: Send + 'a,
    {
        let Self {
            db_url,
            query_timeout,
        } = self;

        let scoped = async move {
            let mut db_conn = DbConnection::establish(db_url).await?;

            query(&mut db_conn).await
        };

        tokio::time::timeout(*query_timeout, scoped)
            .await
            .unwrap_or_else(|_| {
                Err(error::Error::Timeout {
                    seconds: query_timeout.as_secs(),
                })
            })
    }
}

fn read_only_url(db_url: &str) -> String {
    if !db_url.starts_with("file:") {
        return format!("file:{db_url}?mode=ro");
    }

    let separator = if db_url.contains('?') { '&' } else { '?' };
    format!("{db_url}{separator}mode=ro")
}

/// Create the climate tables in an empty database. Only dev mode and tests need this; a
/// production database arrives already populated.
///
/// # Errors
pub async fn run_migrations(db_path: &Utf8Path) -> anyhow::Result<()> {
    let db_path = db_path.to_string();

    tokio::task::spawn_blocking(move || -> anyhow::Result<()> {
        let mut db_conn = SqliteConnection::establish(&db_path)
            .context(format!("failed to create database at {db_path}"))?;

        db_conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| anyhow::anyhow!(err))?;

        Ok(())
    })
    .await?
}
