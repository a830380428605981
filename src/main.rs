//! Persimmon API Server
//!
//! Run with: cargo run --bin persimmon [-- --config path/to/config.toml]
//!
//! Configuration is read from the first of `--config`,
//! `~/.config/persimmon/config.toml`, `/etc/persimmon/config.toml` and
//! `./config.toml` that exists, then overridden by `PERSIMMON_*` environment
//! variables. `RUST_LOG` takes precedence over the configured log level.

use clap::Parser;
use persimmon::api::{serve, AppState};
use persimmon::config::{Config, LoggingConfig};
use persimmon::dataset::DatasetLoader;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "persimmon")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Elective surgery vs. COVID dashboard server")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };

    init_tracing(&config.logging);

    tracing::info!("Starting Persimmon v{}", env!("CARGO_PKG_VERSION"));

    let dataset_config = config.data.to_dataset_config();
    tracing::info!("Data directory: {:?}", dataset_config.data_dir);
    if !dataset_config.data_dir.is_dir() {
        tracing::warn!(
            "Data directory {:?} does not exist; every state will fail to load",
            dataset_config.data_dir
        );
    }

    let loader = Arc::new(DatasetLoader::new(dataset_config));
    let api_config = config.api.to_server_config();
    let state = AppState::new(loader, api_config.clone());

    serve(state, &api_config).await?;

    tracing::info!("Persimmon stopped");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("persimmon={},tower_http=info", logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);

    if logging.is_json() {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
