// API request/response models (DTOs)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::database_ops::store::Country;
use crate::database_ops::RefreshSummary;
use crate::query::{CountryQuery, SortOrder, UnknownSort};

/// Query string of `GET /countries`
#[derive(Debug, Default, Deserialize)]
pub struct ListCountriesParams {
    pub region: Option<String>,
    pub currency: Option<String>,
    pub sort: Option<String>,
}

impl ListCountriesParams {
    /// Empty values are treated as absent.
    pub fn into_query(self) -> Result<CountryQuery, UnknownSort> {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        let sort = match non_empty(self.sort) {
            Some(raw) => Some(raw.parse::<SortOrder>()?),
            None => None,
        };
        Ok(CountryQuery {
            region: non_empty(self.region),
            currency: non_empty(self.currency),
            sort,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub message: String,
    pub countries_added: usize,
    pub skipped: usize,
    pub failed: usize,
    pub last_refreshed_at: DateTime<Utc>,
}

impl From<RefreshSummary> for RefreshResponse {
    fn from(s: RefreshSummary) -> Self {
        Self {
            message: "Countries data fetched and stored successfully.".to_string(),
            countries_added: s.stored,
            skipped: s.skipped,
            failed: s.failed,
            last_refreshed_at: s.refreshed_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub total_countries: usize,
    pub last_refreshed_at: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
}

/// Error body shared by every failure response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Field → reason for a stored record that no longer satisfies the model rules.
pub fn validation_errors(country: &Country) -> BTreeMap<&'static str, &'static str> {
    let mut errors = BTreeMap::new();
    if country.name.trim().is_empty() {
        errors.insert("name", "is required");
    }
    if country.population < 0 {
        errors.insert("population", "must be a non-negative integer");
    }
    if country.currency_code.trim().is_empty() {
        errors.insert("currency_code", "is required");
    }
    errors
}
