use reqwest::Client;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, instrument, warn};

use super::sources::{get_json, json_kind, SourceError};

/// Currency code → units of that currency per 1 USD.
pub type RateTable = BTreeMap<String, f64>;

/// Client for an open.er-api style `latest/USD` endpoint.
#[derive(Clone)]
pub struct ExchangeService {
    http: Client,
    url: String,
}

impl ExchangeService {
    pub const SOURCE: &'static str = "exchange rates";

    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn fetch_usd_rates(&self) -> Result<RateTable, SourceError> {
        let body = get_json(&self.http, Self::SOURCE, &self.url).await?;
        let rates = parse_rates(&body).map_err(|reason| SourceError::Payload {
            source_name: Self::SOURCE,
            url: self.url.clone(),
            reason,
        })?;
        debug!(count = rates.len(), "fetched exchange rates");
        Ok(rates)
    }
}

/// Parse `{ "result": "success", "rates": { "NGN": 1600.5, ... } }`.
///
/// Non-numeric rate values are dropped; the country using them simply ends up
/// without a rate.
pub fn parse_rates(body: &Value) -> Result<RateTable, String> {
    if let Some(result) = body.get("result").and_then(Value::as_str) {
        if !result.eq_ignore_ascii_case("success") {
            let detail = body
                .get("error-type")
                .and_then(Value::as_str)
                .unwrap_or("unknown");
            return Err(format!("result={result} ({detail})"));
        }
    }
    let rates = match body.get("rates") {
        Some(Value::Object(map)) => map,
        Some(other) => return Err(format!("`rates` is {}", json_kind(other))),
        None => return Err("missing `rates` object".to_string()),
    };
    let mut out = RateTable::new();
    for (code, val) in rates {
        match val.as_f64() {
            Some(rate) => {
                out.insert(code.trim().to_string(), rate);
            }
            None => warn!(currency = %code, value = %val, "ignoring non-numeric exchange rate"),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_success_payload() {
        let body = json!({
            "result": "success",
            "base_code": "USD",
            "rates": { "USD": 1, "NGN": 1600.25, "EUR": 0.92, "BAD": "n/a" }
        });
        let rates = parse_rates(&body).unwrap();
        assert_eq!(rates.len(), 3);
        assert_eq!(rates["USD"], 1.0);
        assert_eq!(rates["NGN"], 1600.25);
        assert!(!rates.contains_key("BAD"));
    }

    #[test]
    fn rejects_error_result_and_missing_rates() {
        let err = parse_rates(&json!({ "result": "error", "error-type": "quota-reached" })).unwrap_err();
        assert!(err.contains("quota-reached"));
        assert!(parse_rates(&json!({ "result": "success" })).is_err());
        assert!(parse_rates(&json!({ "rates": [1, 2] })).is_err());
    }

    #[test]
    fn accepts_payload_without_result_field() {
        let rates = parse_rates(&json!({ "rates": { "X": 2.0 } })).unwrap();
        assert_eq!(rates.get("X"), Some(&2.0));
    }
}
