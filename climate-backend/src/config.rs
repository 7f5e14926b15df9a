use std::time::Duration;

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use garde::Validate;

use crate::db::seed_data::SeedData;

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 10;

#[derive(Args, serde::Deserialize, Validate, Clone, Debug)]
#[garde(allow_unvalidated)]
pub struct Config {
    #[arg(skip)]
    #[serde(default)]
    dev: bool,
    /// Path (or `file:` URI) of the `SQLite` climate database
    #[arg(long, env = "CLIMATE_DB_URL")]
    #[garde(length(min = 1))]
    db_url: Option<String>,
    #[arg(long, env = "CLIMATE_HOST", default_value_t = String::from(DEFAULT_HOST))]
    #[serde(default = "default_host")]
    #[garde(length(min = 1))]
    host: String,
    #[arg(long, env = "CLIMATE_PORT", default_value_t = DEFAULT_PORT)]
    #[serde(default = "default_port")]
    port: u16,
    #[arg(long, env = "CLIMATE_QUERY_TIMEOUT_SECS", default_value_t = DEFAULT_QUERY_TIMEOUT_SECS)]
    #[serde(default = "default_query_timeout_secs")]
    #[garde(range(min = 1, max = 300))]
    query_timeout_secs: u64,
    #[arg(skip)]
    #[serde(default)]
    seed_data_path: Option<Utf8PathBuf>,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_query_timeout_secs() -> u64 {
    DEFAULT_QUERY_TIMEOUT_SECS
}

impl Config {
    #[must_use]
    pub fn dev(host: String, port: u16, seed_data_path: Option<Utf8PathBuf>) -> Self {
        Self {
            dev: true,
            db_url: None,
            host,
            port,
            query_timeout_secs: DEFAULT_QUERY_TIMEOUT_SECS,
            seed_data_path,
        }
    }

    #[must_use]
    pub fn is_dev(&self) -> bool {
        self.dev
    }

    #[must_use]
    pub fn app_address(&self) -> String {
        let Self { host, port, .. } = self;

        format!("{host}:{port}")
    }

    /// # Errors
    /// Fails outside dev mode when no database was configured.
    pub fn db_url(&self) -> anyhow::Result<&str> {
        self.db_url
            .as_deref()
            .context("`--db-url` (or CLIMATE_DB_URL) is required outside dev mode")
    }

    #[must_use]
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    /// # Errors
    pub fn seed_data(&self) -> anyhow::Result<SeedData> {
        match &self.seed_data_path {
            Some(path) => SeedData::from_path(path),
            None => Ok(SeedData::sample()),
        }
    }
}

#[derive(Parser)]
#[command(version, about = "Read-only JSON API over a climate observations database")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Serve a temporary database populated with seed data
    Dev {
        #[arg(long, default_value_t = String::from(DEFAULT_HOST))]
        host: String,
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
        /// JSON file of stations and measurements to write into the temporary database
        #[arg(long)]
        seed_data_path: Option<Utf8PathBuf>,
    },
    /// Serve an existing climate database
    Prod {
        #[command(flatten)]
        config: Config,
        #[arg(long, env = "CLIMATE_LOG_DIR")]
        log_dir: Option<Utf8PathBuf>,
    },
}
