use std::sync::Arc;

use anyhow::Context;
use axum::{Router, routing::get};
use camino::Utf8PathBuf;
use diesel_async::AsyncConnection;
use garde::Validate;
use tempfile::TempDir;
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;

use crate::{
    config::Config,
    db::{self, DbConnection, Store},
};

mod api;

/// # Errors
pub async fn serve(config: Config, log_dir: Option<Utf8PathBuf>) -> anyhow::Result<()> {
    initialize_logging(log_dir).context("failed to initialize logging")?;

    config.validate().context("invalid configuration")?;
    let app_addr = config.app_address();

    let app_state = AppState::new(&config)
        .await
        .context("failed to initialize app state")?;
    tracing::info!("initialized app state");

    let app = app(app_state);

    let listener = TcpListener::bind(&app_addr)
        .await
        .context(format!("failed to listen on {app_addr}"))?;
    tracing::info!("climate API listening on {app_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("failed to serve app")?;

    Ok(())
}

fn initialize_logging(log_dir: Option<Utf8PathBuf>) -> anyhow::Result<()> {
    use tracing::Level;
    use tracing_subscriber::{filter::Targets, prelude::*};

    let log_layer = tracing_subscriber::fmt::layer();

    match log_dir {
        None => {
            let dev_test_log_filter = Targets::new()
                .with_target("climate_backend", Level::DEBUG)
                .with_target("tower_http", Level::TRACE);
            let log_layer = log_layer.pretty().with_filter(dev_test_log_filter);

            tracing_subscriber::registry().with(log_layer).try_init()?;
        }
        Some(path) => {
            let log_writer = tracing_appender::rolling::daily(path, "climate.log");
            let prod_log_filter = Targets::new().with_target("climate_backend", Level::INFO);
            let log_layer = log_layer
                .json()
                .with_writer(log_writer)
                .with_filter(prod_log_filter);

            tracing_subscriber::registry().with(log_layer).try_init()?;
        }
    }

    Ok(())
}

#[derive(Clone)]
enum AppState {
    Dev {
        store: Store,
        _db_dir: Arc<TempDir>,
    },
    Prod {
        store: Store,
    },
}
impl AppState {
    async fn new(config: &Config) -> anyhow::Result<Self> {
        let query_timeout = config.query_timeout();

        let state = if config.is_dev() {
            let db_dir = tempfile::tempdir().context("failed to create dev database directory")?;
            let db_path = Utf8PathBuf::from_path_buf(db_dir.path().join("climate.sqlite"))
                .map_err(|path| anyhow::anyhow!("non UTF-8 database path {}", path.display()))?;

            db::run_migrations(&db_path)
                .await
                .context("failed to run database migrations")?;
            tracing::info!("ran database migrations");

            let seed_data = config.seed_data()?;
            let mut db_conn = DbConnection::establish(db_path.as_str()).await?;
            seed_data
                .write(&mut db_conn)
                .await
                .context("failed to insert seed data")?;
            tracing::info!("inserted seed data");

            Self::Dev {
                store: Store::open(db_path.as_str(), query_timeout).await?,
                _db_dir: Arc::new(db_dir),
            }
        } else {
            let db_url = config.db_url()?;
            let store = Store::open(db_url, query_timeout)
                .await
                .context(format!("failed to open climate database at {db_url}"))?;

            Self::Prod { store }
        };

        Ok(state)
    }

    fn store(&self) -> &Store {
        use AppState::{Dev, Prod};

        match self {
            Dev { store, .. } | Prod { store } => store,
        }
    }
}

fn app(app_state: AppState) -> Router {
    api::router()
        .layer(TraceLayer::new_for_http())
        .route("/health", get(async || ()))
        .with_state(app_state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(%err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
