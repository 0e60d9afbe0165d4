//! Process configuration assembled from the environment once at startup.

use anyhow::{bail, Result};
use std::path::PathBuf;
use std::time::Duration;

use crate::util::env::{db_url, env_opt, env_parse, preflight_check};

pub const DEFAULT_COUNTRIES_API_URL: &str =
    "https://restcountries.com/v2/all?fields=name,capital,region,population,flag,currencies";
pub const DEFAULT_EXCHANGE_RATE_API_URL: &str = "https://open.er-api.com/v6/latest/USD";

/// Default bounds of the per-capita factor used for estimated GDP.
pub const DEFAULT_GDP_FACTOR_MIN: f64 = 1000.0;
pub const DEFAULT_GDP_FACTOR_MAX: f64 = 2000.0;

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub countries_url: String,
    pub exchange_rates_url: String,
    pub timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            countries_url: DEFAULT_COUNTRIES_API_URL.to_string(),
            exchange_rates_url: DEFAULT_EXCHANGE_RATE_API_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origins: String,
    pub database_url: String,
    pub max_connections: u32,
    pub upstream: UpstreamConfig,
    pub gdp_factor_min: f64,
    pub gdp_factor_max: f64,
    pub summary_cache_dir: PathBuf,
}

impl AppConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        preflight_check(
            "country-exchange",
            &[],
            &[
                "DATABASE_URL",
                "DB_HOST",
                "API_HOST",
                "API_PORT",
                "COUNTRIES_API_URL",
                "EXCHANGE_RATE_API_URL",
                "SUMMARY_CACHE_DIR",
            ],
        )?;

        let config = Self {
            host: env_opt("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: env_parse("API_PORT", 3000u16),
            allowed_origins: env_opt("ALLOWED_ORIGINS")
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
            database_url: db_url()?,
            max_connections: env_parse("DB_MAX_CONNS", 5u32),
            upstream: UpstreamConfig {
                countries_url: env_opt("COUNTRIES_API_URL")
                    .unwrap_or_else(|| DEFAULT_COUNTRIES_API_URL.to_string()),
                exchange_rates_url: env_opt("EXCHANGE_RATE_API_URL")
                    .unwrap_or_else(|| DEFAULT_EXCHANGE_RATE_API_URL.to_string()),
                timeout: Duration::from_secs(env_parse("UPSTREAM_TIMEOUT_SECS", 30u64)),
            },
            gdp_factor_min: env_parse("GDP_FACTOR_MIN", DEFAULT_GDP_FACTOR_MIN),
            gdp_factor_max: env_parse("GDP_FACTOR_MAX", DEFAULT_GDP_FACTOR_MAX),
            summary_cache_dir: PathBuf::from(
                env_opt("SUMMARY_CACHE_DIR").unwrap_or_else(|| "cache".to_string()),
            ),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        validate_factor_range(self.gdp_factor_min, self.gdp_factor_max)?;
        if self.upstream.timeout.is_zero() {
            bail!("UPSTREAM_TIMEOUT_SECS must be greater than zero");
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub fn validate_factor_range(min: f64, max: f64) -> Result<()> {
    if !min.is_finite() || !max.is_finite() || min <= 0.0 {
        bail!("GDP factor bounds must be positive finite numbers (got {min}..={max})");
    }
    if min > max {
        bail!("GDP_FACTOR_MIN ({min}) must not exceed GDP_FACTOR_MAX ({max})");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factor_range_rules() {
        assert!(validate_factor_range(1000.0, 2000.0).is_ok());
        assert!(validate_factor_range(1500.0, 1500.0).is_ok());
        assert!(validate_factor_range(2000.0, 1000.0).is_err());
        assert!(validate_factor_range(0.0, 10.0).is_err());
        assert!(validate_factor_range(1.0, f64::INFINITY).is_err());
    }
}
