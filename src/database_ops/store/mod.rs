//! Upsert store for country records, keyed by country name.

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

pub mod postgres;
pub mod sqlite;

pub use postgres::PgCountryStore;
pub use sqlite::SqliteCountryStore;

/// A stored country row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Country {
    pub name: String,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub population: i64,
    pub currency_code: String,
    pub exchange_rate: Option<f64>,
    pub estimated_gdp: f64,
    pub flag_url: Option<String>,
    pub last_refreshed_at: DateTime<Utc>,
}

/// Transform output; `last_refreshed_at` is assigned by the store at write time.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCountry {
    pub name: String,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub population: i64,
    pub currency_code: String,
    pub exchange_rate: Option<f64>,
    pub estimated_gdp: f64,
    pub flag_url: Option<String>,
}

impl NewCountry {
    /// Attach the write timestamp. Truncated to microseconds to match what the database keeps.
    pub fn stamped(self, at: DateTime<Utc>) -> Country {
        Country {
            name: self.name,
            capital: self.capital,
            region: self.region,
            population: self.population,
            currency_code: self.currency_code,
            exchange_rate: self.exchange_rate,
            estimated_gdp: self.estimated_gdp,
            flag_url: self.flag_url,
            last_refreshed_at: at.trunc_subsecs(6),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreStatus {
    pub total_countries: usize,
    pub last_refreshed_at: Option<DateTime<Utc>>,
}

impl StoreStatus {
    pub fn from_listing(countries: &[Country]) -> Self {
        Self {
            total_countries: countries.len(),
            last_refreshed_at: countries.iter().map(|c| c.last_refreshed_at).max(),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("unsupported database url scheme {0:?} (expected postgres:// or sqlite:)")]
    UnsupportedScheme(String),
    #[error("failed to open database: {0}")]
    Open(String),
}

#[async_trait]
pub trait CountryStore: Send + Sync {
    /// Insert, or overwrite every field of the record with the same name.
    async fn upsert(&self, country: NewCountry) -> Result<Country, StoreError>;

    /// Exact, case-sensitive lookup.
    async fn get(&self, name: &str) -> Result<Option<Country>, StoreError>;

    async fn list_all(&self) -> Result<Vec<Country>, StoreError>;

    /// `Ok(false)` when nothing matched.
    async fn delete(&self, name: &str) -> Result<bool, StoreError>;

    async fn status(&self) -> Result<StoreStatus, StoreError> {
        let all = self.list_all().await?;
        Ok(StoreStatus::from_listing(&all))
    }

    async fn ping(&self) -> bool;

    async fn close(&self);
}

pub type SharedStore = Arc<dyn CountryStore>;

/// Open the backend named by the URL scheme and make sure the table exists.
pub async fn open_store(database_url: &str, max_connections: u32) -> Result<SharedStore, StoreError> {
    let scheme = database_url
        .split_once(':')
        .map(|(s, _)| s.to_ascii_lowercase())
        .unwrap_or_default();
    match scheme.as_str() {
        "postgres" | "postgresql" => {
            let db = crate::util::db::Db::connect(database_url, max_connections)
                .await
                .map_err(|e| StoreError::Open(format!("{e:#}")))?;
            let store = PgCountryStore::new(db);
            store.ensure_schema().await?;
            Ok(Arc::new(store))
        }
        "sqlite" => {
            let pool = crate::util::db::connect_sqlite(database_url, max_connections)
                .await
                .map_err(|e| StoreError::Open(format!("{e:#}")))?;
            let store = SqliteCountryStore::new(pool);
            store.ensure_schema().await?;
            Ok(Arc::new(store))
        }
        _ => Err(StoreError::UnsupportedScheme(scheme)),
    }
}
