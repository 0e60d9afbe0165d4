use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::{Country, CountryStore, NewCountry, StoreError};

const COLUMNS: &str = "name, capital, region, population, currency_code, exchange_rate, \
                       estimated_gdp, flag_url, last_refreshed_at";

/// SQLite backend, used for local runs and the test-suite (`sqlite::memory:`).
#[derive(Clone)]
pub struct SqliteCountryStore {
    pool: SqlitePool,
}

impl SqliteCountryStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS countries (
                name              TEXT PRIMARY KEY NOT NULL,
                capital           TEXT,
                region            TEXT,
                population        INTEGER NOT NULL CHECK (population >= 0),
                currency_code     TEXT NOT NULL,
                exchange_rate     REAL,
                estimated_gdp     REAL NOT NULL DEFAULT 0,
                flag_url          TEXT,
                last_refreshed_at DATETIME NOT NULL
             )",
        )
        .execute(&self.pool)
        .await?;
        info!("countries table ready (sqlite)");
        Ok(())
    }
}

#[async_trait]
impl CountryStore for SqliteCountryStore {
    async fn upsert(&self, country: NewCountry) -> Result<Country, StoreError> {
        let row = country.stamped(Utc::now());
        sqlx::query(
            "INSERT INTO countries (name, capital, region, population, currency_code, exchange_rate, estimated_gdp, flag_url, last_refreshed_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT (name) DO UPDATE SET \
                capital=excluded.capital, region=excluded.region, population=excluded.population, \
                currency_code=excluded.currency_code, exchange_rate=excluded.exchange_rate, \
                estimated_gdp=excluded.estimated_gdp, flag_url=excluded.flag_url, \
                last_refreshed_at=excluded.last_refreshed_at",
        )
        .bind(&row.name)
        .bind(&row.capital)
        .bind(&row.region)
        .bind(row.population)
        .bind(&row.currency_code)
        .bind(row.exchange_rate)
        .bind(row.estimated_gdp)
        .bind(&row.flag_url)
        .bind(row.last_refreshed_at)
        .execute(&self.pool)
        .await?;
        debug!(name = %row.name, "upserted country (sqlite)");
        Ok(row)
    }

    async fn get(&self, name: &str) -> Result<Option<Country>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM countries WHERE name = ?");
        let row = sqlx::query_as::<_, Country>(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_all(&self) -> Result<Vec<Country>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM countries");
        let rows = sqlx::query_as::<_, Country>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn delete(&self, name: &str) -> Result<bool, StoreError> {
        let res = sqlx::query("DELETE FROM countries WHERE name = ?")
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
