use anyhow::{Context, Result};
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions, PgSslMode},
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    PgPool, SqlitePool,
};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, instrument};

/// Postgres connection pool shared by every component of the process.
#[derive(Clone)]
pub struct Db {
    pub pool: PgPool,
}

impl Db {
    // SECURITY: never include raw DSNs in tracing spans (they may contain credentials).
    #[instrument(skip(database_url))]
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let use_prepared = crate::util::env::env_flag("USE_PREPARED", false);
        let mut connect_options =
            PgConnectOptions::from_str(database_url).context("invalid postgres DSN")?;

        // Ensure TLS is enabled when DSN contains sslmode=require
        if database_url.contains("sslmode=require") {
            connect_options = connect_options.ssl_mode(PgSslMode::Require);
        }

        if !use_prepared {
            // PgBouncer txn mode safe
            connect_options = connect_options.statement_cache_capacity(0);
        }

        let pool = PgPoolOptions::new()
            .max_connections(max_connections.max(1))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(600))
            .connect_with(connect_options)
            .await
            .context("failed to connect to postgres")?;
        info!("connected to db (postgres)");
        Ok(Self { pool })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Open a SQLite pool. In-memory databases are pinned to a single connection
/// that is never recycled, otherwise every new connection would see an empty database.
#[instrument(skip(database_url))]
pub async fn connect_sqlite(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");
    let connect_options = SqliteConnectOptions::from_str(database_url)
        .context("invalid sqlite DSN")?
        .create_if_missing(true);

    let options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .acquire_timeout(Duration::from_secs(10))
    };

    let pool = options
        .connect_with(connect_options)
        .await
        .context("failed to open sqlite database")?;
    info!(in_memory, "connected to db (sqlite)");
    Ok(pool)
}
