use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument, warn};

use super::exchange::ExchangeService;
use super::sources::{CountryCatalogClient, SourceError};
use super::store::SharedStore;
use super::transform::transform_all;
use crate::normalization::gdp::GdpFactorSource;
use crate::summary::SummaryRenderer;

#[derive(Debug, Error)]
pub enum RefreshError {
    /// Either upstream could not be reached or returned garbage. Nothing was written.
    #[error(transparent)]
    Upstream(#[from] SourceError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshSummary {
    /// Entries served by the catalog.
    pub fetched: usize,
    pub stored: usize,
    /// Dropped for missing name, population or currency.
    pub skipped: usize,
    /// Malformed entries plus records the store refused.
    pub failed: usize,
    pub refreshed_at: DateTime<Utc>,
}

/// Fetch → transform → upsert → summary image.
#[derive(Clone)]
pub struct RefreshService {
    catalog: CountryCatalogClient,
    exchange: ExchangeService,
    store: SharedStore,
    factors: Arc<dyn GdpFactorSource>,
    summary: Option<SummaryRenderer>,
}

impl RefreshService {
    pub fn new(
        catalog: CountryCatalogClient,
        exchange: ExchangeService,
        store: SharedStore,
        factors: Arc<dyn GdpFactorSource>,
    ) -> Self {
        Self {
            catalog,
            exchange,
            store,
            factors,
            summary: None,
        }
    }

    pub fn with_summary(mut self, renderer: SummaryRenderer) -> Self {
        self.summary = Some(renderer);
        self
    }

    #[instrument(skip(self), name = "refresh")]
    pub async fn run(&self) -> Result<RefreshSummary, RefreshError> {
        let started = Utc::now();

        // Both upstreams must answer before anything is written.
        let entries = self.catalog.fetch_all().await?;
        let rates = self.exchange.fetch_usd_rates().await?;
        info!(entries = entries.len(), rates = rates.len(), "upstream data fetched");

        let batch = transform_all(&entries, &rates, self.factors.as_ref());

        let mut stored = 0usize;
        let mut store_failures = 0usize;
        for record in batch.records {
            let name = record.name.clone();
            match self.store.upsert(record).await {
                Ok(_) => stored += 1,
                Err(e) => {
                    warn!(country = %name, error = %e, "failed to store country; continuing");
                    store_failures += 1;
                }
            }
        }

        let summary = RefreshSummary {
            fetched: entries.len(),
            stored,
            skipped: batch.skipped,
            failed: batch.failed + store_failures,
            refreshed_at: Utc::now(),
        };
        info!(
            fetched = summary.fetched,
            stored = summary.stored,
            skipped = summary.skipped,
            failed = summary.failed,
            elapsed_ms = (summary.refreshed_at - started).num_milliseconds(),
            "refresh complete"
        );

        if let Some(renderer) = &self.summary {
            match self.store.list_all().await {
                Ok(listing) => {
                    if let Err(e) = renderer.write(&listing).await {
                        warn!(error = %e, "failed to write summary image");
                    }
                }
                Err(e) => warn!(error = %e, "could not list countries for summary image"),
            }
        }

        Ok(summary)
    }
}
