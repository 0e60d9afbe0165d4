// API server implementation using actix-web

use crate::api::{middleware, routes, AppState};
use crate::config::AppConfig;
use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};

pub struct ApiServer {
    pub host: String,
    pub port: u16,
    pub allowed_origins: String,
}

impl ApiServer {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            allowed_origins: config.allowed_origins.clone(),
        }
    }

    /// Start the HTTP server
    pub async fn run(self, state: AppState) -> Result<()> {
        let bind_addr = format!("{}:{}", self.host, self.port);

        tracing::info!(
            host = %self.host,
            port = %self.port,
            "Starting country-exchange API server"
        );

        let state = web::Data::new(state);
        let allowed_origins = self.allowed_origins.clone();

        HttpServer::new(move || {
            let (logger, compress) = middleware::setup_middleware();
            let cors = middleware::setup_cors(&allowed_origins);

            App::new()
                .app_data(state.clone())
                .wrap(middleware::normalize_path())
                .wrap(compress)
                .wrap(cors)
                .wrap(logger)
                .configure(routes::configure_routes)
        })
        .bind(&bind_addr)
        .with_context(|| format!("Failed to bind to {}", bind_addr))?
        .run()
        .await
        .context("HTTP server error")?;

        Ok(())
    }
}
