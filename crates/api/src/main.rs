use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use api::catalog::catalog_for;
use api::cli::Cli;
use api::server::{serve, shutdown_signal};
use api::{build_router, ApiState};
use clap::Parser;
use common::{config::AppConfig, logging};
use db::pg::PgDatabase;
use db::Repositories;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // `.env` may carry RUST_LOG / LOG_FORMAT, so it is loaded before logging.
    let dotenv = dotenvy::dotenv();
    logging::init_logging("info");
    if let Err(err) = dotenv {
        warn!(error = %err, ".env file not found or cannot be loaded");
    }

    let cli = Cli::parse();
    let config = cli.apply(AppConfig::load().context("failed to load configuration")?);

    let database = PgDatabase::connect(&config.database)
        .await
        .context("failed to initialise database")?;
    let repositories: Arc<dyn Repositories> = Arc::new(database);
    let state = Arc::new(ApiState {
        catalog: catalog_for(config.catalog.source, repositories),
    });
    let app = build_router(state);

    let addr = config.api.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, source = ?config.catalog.source, "api listening");

    serve(
        listener,
        app,
        shutdown_signal(),
        Duration::from_secs(config.api.shutdown_grace_secs),
    )
    .await
}
