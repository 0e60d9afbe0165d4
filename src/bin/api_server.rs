// HTTP API server binary for country-exchange

use anyhow::Result;
use country_exchange::api::{ApiServer, AppState};
use country_exchange::config::AppConfig;
use country_exchange::database_ops::open_store;
use country_exchange::tracing::{init_tracing, DEFAULT_FILTER};
use country_exchange::util::env as env_util;

#[actix_web::main]
async fn main() -> Result<()> {
    // Load dotenv/env once (safe to call multiple times)
    env_util::init_env();
    init_tracing(DEFAULT_FILTER)?;

    tracing::info!("Initializing country-exchange API server");

    let config = AppConfig::from_env()?;

    let store = open_store(&config.database_url, config.max_connections).await?;
    tracing::info!(
        url = %env_util::redact_value("DATABASE_URL", &config.database_url),
        "Database connected successfully"
    );

    let state = AppState::from_config(&config, store.clone())?;
    let result = ApiServer::from_config(&config).run(state).await;

    store.close().await;
    result
}
