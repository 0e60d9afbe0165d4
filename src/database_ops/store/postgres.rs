use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info};

use super::{Country, CountryStore, NewCountry, StoreError};
use crate::util::db::Db;

const COLUMNS: &str = "name, capital, region, population, currency_code, exchange_rate, \
                       estimated_gdp, flag_url, last_refreshed_at";

#[derive(Clone)]
pub struct PgCountryStore {
    db: Db,
}

impl PgCountryStore {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        // raw_sql avoids prepared statements under PgBouncer
        sqlx::raw_sql(
            "CREATE TABLE IF NOT EXISTS countries (
                name              TEXT PRIMARY KEY,
                capital           TEXT,
                region            TEXT,
                population        BIGINT NOT NULL CHECK (population >= 0),
                currency_code     TEXT NOT NULL,
                exchange_rate     DOUBLE PRECISION,
                estimated_gdp     DOUBLE PRECISION NOT NULL DEFAULT 0,
                flag_url          TEXT,
                last_refreshed_at TIMESTAMPTZ NOT NULL
             )",
        )
        .execute(&self.db.pool)
        .await?;
        info!("countries table ready (postgres)");
        Ok(())
    }
}

#[async_trait]
impl CountryStore for PgCountryStore {
    async fn upsert(&self, country: NewCountry) -> Result<Country, StoreError> {
        let row = country.stamped(Utc::now());
        sqlx::query(
            "INSERT INTO countries (name, capital, region, population, currency_code, exchange_rate, estimated_gdp, flag_url, last_refreshed_at) \
             VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9) \
             ON CONFLICT (name) DO UPDATE SET \
                capital=EXCLUDED.capital, region=EXCLUDED.region, population=EXCLUDED.population, \
                currency_code=EXCLUDED.currency_code, exchange_rate=EXCLUDED.exchange_rate, \
                estimated_gdp=EXCLUDED.estimated_gdp, flag_url=EXCLUDED.flag_url, \
                last_refreshed_at=EXCLUDED.last_refreshed_at",
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
        .execute(&self.db.pool)
        .await?;
        debug!(name = %row.name, "upserted country (postgres)");
        Ok(row)
    }

    async fn get(&self, name: &str) -> Result<Option<Country>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM countries WHERE name = $1");
        let row = sqlx::query_as::<_, Country>(&sql)
            .bind(name)
            .fetch_optional(&self.db.pool)
            .await?;
        Ok(row)
    }

    async fn list_all(&self) -> Result<Vec<Country>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM countries");
        let rows = sqlx::query_as::<_, Country>(&sql)
            .fetch_all(&self.db.pool)
            .await?;
        Ok(rows)
    }

    async fn delete(&self, name: &str) -> Result<bool, StoreError> {
        let res = sqlx::query("DELETE FROM countries WHERE name = $1")
            .bind(name)
            .execute(&self.db.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn ping(&self) -> bool {
        sqlx::query_scalar::<_, bool>("SELECT true")
            .fetch_one(&self.db.pool)
            .await
            .is_ok()
    }

    async fn close(&self) {
        self.db.close().await;
    }
}
