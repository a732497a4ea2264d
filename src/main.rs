use std::sync::Arc;

use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use dotenvy::dotenv;
use tokio::sync::watch;

mod api;
mod auth;
mod config;
mod db;
mod docs;
mod engine;
mod error;
mod model;
mod render;
mod routes;
mod service;
mod store;

use config::Config;
use db::init_db;

use crate::docs::ApiDoc;
use crate::engine::sweep::run_liveness_sweep;
use crate::render::CsvRenderer;
use crate::service::AppState;
use crate::store::mysql::{MySqlDeviceRegistry, MySqlEventStore, MySqlStaffDirectory};
use tracing::{error, info};
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.tracing_level())
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(addr = %config.server_addr, "Server starting...");

    let pool = init_db(&config.database_url, config.db_max_connections).await?;

    if let Err(e) = auth::seed::ensure_admin(&pool, &config).await {
        error!(error = %e, "Failed to seed admin user");
    }

    let devices = Arc::new(MySqlDeviceRegistry::new(pool.clone()));
    let state = AppState::new(
        Arc::new(MySqlStaffDirectory::new(pool.clone())),
        Arc::new(MySqlEventStore::new(pool.clone())),
        devices.clone(),
        Arc::new(CsvRenderer),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweep = actix_web::rt::spawn(run_liveness_sweep(
        devices,
        config.sweep_settings(),
        shutdown_rx,
    ));

    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // wildcard so the JS/CSS assets match
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(state.clone()))
            .app_data(Data::new(config_data.clone()))
            .configure(|cfg| routes::configure(cfg, &config_data))
    })
    .bind(server_addr)?
    .run()
    .await?;

    info!("Server stopped, waiting for device sweep");
    let _ = shutdown_tx.send(true);
    if let Err(e) = sweep.await {
        error!(error = %e, "Device sweep task failed");
    }

    Ok(())
}
