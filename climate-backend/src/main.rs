use clap::Parser;
use climate_backend::{
    config::{Cli, Command, Config},
    server,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let Cli { command } = Cli::parse();

    match command {
        Command::Dev {
            host,
            port,
            seed_data_path,
        } => server::serve(Config::dev(host, port, seed_data_path), None).await,
        Command::Prod { config, log_dir } => server::serve(config, log_dir).await,
    }
}
