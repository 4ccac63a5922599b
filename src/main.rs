use std::sync::Arc;

use actix_web::middleware::{Logger, NormalizePath};
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::Context;
use tracing::{error, info};
use tracing_appender::rolling;

use pms::auth::password::CredentialPolicy;
use pms::config::Config;
use pms::error::CONNECTION_REMEDIATION;
use pms::routes;
use pms::store::{MySqlStore, PerformanceStore};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("invalid configuration")?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "pms.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    info!("Server starting...");

    let credentials = CredentialPolicy::new(config.allow_plaintext_passwords);
    if credentials.allow_plaintext {
        info!("Plaintext credentials are accepted for legacy rows");
    }

    // Startup check: an unreachable store stops the server here.
    let store = match MySqlStore::connect(&config.database, credentials).await {
        Ok(store) => store,
        Err(e) => {
            error!(error = %e, "Could not connect to the database");
            eprintln!("Could not connect to the database.\n\n{e}\n\nHow to fix this:\n{CONNECTION_REMEDIATION}");
            return Err(e.into());
        }
    };
    store.ping().await.context("database ping failed")?;
    info!(host = %config.database.host, database = %config.database.database, "Database connection successful");

    let store: Arc<dyn PerformanceStore> = Arc::new(store);
    let server_addr = config.server_addr.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .app_data(Data::from(store.clone()))
            .app_data(Data::new(config.clone()))
            .configure(|cfg| routes::configure(cfg, &config))
    })
    .bind(&server_addr)?
    .run()
    .await?;

    Ok(())
}
