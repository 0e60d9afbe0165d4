// Country catalog upstream (restcountries-style JSON array)

use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::UpstreamConfig;

/// Failure reaching or decoding one of the upstream data sources.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{source_name} request to {url} failed: {error}")]
    Transport {
        source_name: &'static str,
        url: String,
        #[source]
        error: reqwest::Error,
    },
    #[error("{source_name} returned an unusable payload from {url}: {reason}")]
    Payload {
        source_name: &'static str,
        url: String,
        reason: String,
    },
}

impl SourceError {
    pub fn source_name(&self) -> &'static str {
        match self {
            Self::Transport { source_name, .. } | Self::Payload { source_name, .. } => source_name,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Transport { url, .. } | Self::Payload { url, .. } => url,
        }
    }
}

/// Build the shared HTTP client used for both upstreams.
pub fn http_client(cfg: &UpstreamConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(cfg.timeout)
        .user_agent(concat!("country-exchange/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// GET `url`, require a 2xx status and decode the body as JSON.
pub(crate) async fn get_json(
    http: &Client,
    source_name: &'static str,
    url: &str,
) -> Result<Value, SourceError> {
    let transport = |error| SourceError::Transport {
        source_name,
        url: url.to_string(),
        error,
    };
    let resp = http
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(transport)?;
    resp.json::<Value>().await.map_err(transport)
}

#[derive(Clone)]
pub struct CountryCatalogClient {
    http: Client,
    url: String,
}

impl CountryCatalogClient {
    pub const SOURCE: &'static str = "country catalog";

    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Raw entries exactly as served; normalization happens in the transform stage.
    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn fetch_all(&self) -> Result<Vec<Value>, SourceError> {
        let body = get_json(&self.http, Self::SOURCE, &self.url).await?;
        match body {
            Value::Array(entries) => {
                debug!(count = entries.len(), "fetched country catalog");
                Ok(entries)
            }
            other => Err(SourceError::Payload {
                source_name: Self::SOURCE,
                url: self.url.clone(),
                reason: format!("expected a JSON array, got {}", json_kind(&other)),
            }),
        }
    }
}

pub(crate) fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
