// HTTP surface of the country exchange service

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::database_ops::exchange::ExchangeService;
use crate::database_ops::sources::{http_client, CountryCatalogClient};
use crate::database_ops::{RefreshService, SharedStore};
use crate::normalization::RandomFactor;
use crate::summary::SummaryRenderer;

pub use errors::ApiError;
pub use server::ApiServer;

/// Shared per-worker state handed to every handler through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub refresh: RefreshService,
    pub summary: SummaryRenderer,
}

impl AppState {
    pub fn new(store: SharedStore, refresh: RefreshService, summary: SummaryRenderer) -> Self {
        Self {
            store,
            refresh,
            summary,
        }
    }

    /// Wire the upstream clients, GDP factor source and image cache from configuration.
    pub fn from_config(config: &AppConfig, store: SharedStore) -> anyhow::Result<Self> {
        let http = http_client(&config.upstream)?;
        let catalog = CountryCatalogClient::new(http.clone(), config.upstream.countries_url.clone());
        let exchange = ExchangeService::new(http, config.upstream.exchange_rates_url.clone());
        let factors = Arc::new(RandomFactor::new(config.gdp_factor_min, config.gdp_factor_max));
        let summary = SummaryRenderer::new(config.summary_cache_dir.clone());
        let refresh = RefreshService::new(catalog, exchange, store.clone(), factors)
            .with_summary(summary.clone());
        Ok(Self::new(store, refresh, summary))
    }
}
