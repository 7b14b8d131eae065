#[macro_use]
extern crate log;

use std::sync::Arc;

use actix_web::web;
use anyhow::Context;
use dotenv::dotenv;

use crate::service::ForecastService;
use crate::settings::config::{get_run_mode, load_settings};
use crate::storage::postgres::{create_pool, PgGateway};

mod app;
mod endpoints;
mod logging;
mod service;
mod settings;
mod shaping;
mod storage;
mod upload;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    logging::init_logging();

    info!("Forecast server starting");

    let run_mode = get_run_mode();
    let config = load_settings(format!("configs/{}.yaml", run_mode))
        .with_context(|| format!("Failed to load settings file for run mode {}", run_mode))?;

    if let Err(err) = config.validate() {
        error!("Validation error: {}", err);
        return Err(anyhow::anyhow!(err));
    }

    let pool = create_pool(&config.database).context("Failed to create the database pool")?;
    let gateway = PgGateway::new(pool, config.upload.clone());
    let service = web::Data::new(ForecastService::new(Arc::new(gateway), &config));

    let (server, _) = app::run_server(&config, service).with_context(|| {
        format!(
            "Error binding to socket {}:{}",
            config.server.host, config.server.port
        )
    })?;
    server.await?;

    info!("Forecast server stopped");

    Ok(())
}
