use serde_json::Value;
use thiserror::Error;

use super::currency::primary_currency_code;

/// Fields pulled out of one raw catalog entry, before rates are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedCountry {
    pub name: String,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub population: i64,
    pub currency_code: String,
    pub flag_url: Option<String>,
}

/// Malformed entry. Logged and skipped by the caller, never fatal for a batch.
#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    #[error("catalog entry is not a JSON object")]
    NotAnObject,
    #[error("country {name:?}: population {raw} is not a non-negative integer")]
    InvalidPopulation { name: String, raw: String },
}

/// Extract the stored fields of a catalog entry.
///
/// `Ok(None)` means the entry lacks a name, a population or a resolvable
/// currency and is dropped without counting as a failure.
pub fn normalize_entry(entry: &Value) -> Result<Option<NormalizedCountry>, NormalizeError> {
    let obj = entry.as_object().ok_or(NormalizeError::NotAnObject)?;

    let Some(name) = obj.get("name").and_then(name_text) else {
        return Ok(None);
    };

    let population = match obj.get("population") {
        None | Some(Value::Null) => return Ok(None),
        Some(raw) => parse_population(raw).ok_or_else(|| NormalizeError::InvalidPopulation {
            name: name.clone(),
            raw: raw.to_string(),
        })?,
    };

    let Some(currency_code) = obj.get("currencies").and_then(primary_currency_code) else {
        return Ok(None);
    };

    Ok(Some(NormalizedCountry {
        name,
        capital: obj.get("capital").and_then(first_text),
        region: obj.get("region").and_then(plain_text),
        population,
        currency_code,
        flag_url: obj
            .get("flag")
            .and_then(plain_text)
            .or_else(|| obj.get("flags").and_then(|f| f.get("png")).and_then(plain_text)),
    }))
}

// v2 sends a string, v3.1 sends { "common": ..., "official": ... }
fn name_text(v: &Value) -> Option<String> {
    plain_text(v).or_else(|| v.get("common").and_then(plain_text))
}

// v2 sends a string, v3.1 sends a list
fn first_text(v: &Value) -> Option<String> {
    match v {
        Value::Array(items) => items.iter().find_map(plain_text),
        other => plain_text(other),
    }
}

fn plain_text(v: &Value) -> Option<String> {
    let s = v.as_str()?.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn parse_population(v: &Value) -> Option<i64> {
    if let Some(n) = v.as_i64() {
        return (n >= 0).then_some(n);
    }
    let f = v.as_f64()?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_v2_entry() {
        let entry = json!({
            "name": "Nigeria",
            "capital": "Abuja",
            "region": "Africa",
            "population": 206139587,
            "flag": "https://flagcdn.com/ng.svg",
            "currencies": [{ "code": "NGN", "name": "Nigerian naira", "symbol": "₦" }]
        });
        let c = normalize_entry(&entry).unwrap().unwrap();
        assert_eq!(c.name, "Nigeria");
        assert_eq!(c.capital.as_deref(), Some("Abuja"));
        assert_eq!(c.region.as_deref(), Some("Africa"));
        assert_eq!(c.population, 206139587);
        assert_eq!(c.currency_code, "NGN");
        assert_eq!(c.flag_url.as_deref(), Some("https://flagcdn.com/ng.svg"));
    }

    #[test]
    fn normalizes_v3_entry() {
        let entry = json!({
            "name": { "common": "Ghana", "official": "Republic of Ghana" },
            "capital": ["Accra"],
            "region": "Africa",
            "population": 31072945,
            "flags": { "png": "https://flagcdn.com/w320/gh.png" },
            "currencies": { "GHS": { "name": "Ghanaian cedi" } }
        });
        let c = normalize_entry(&entry).unwrap().unwrap();
        assert_eq!(c.name, "Ghana");
        assert_eq!(c.capital.as_deref(), Some("Accra"));
        assert_eq!(c.currency_code, "GHS");
        assert_eq!(c.flag_url.as_deref(), Some("https://flagcdn.com/w320/gh.png"));
    }

    #[test]
    fn drops_entries_missing_required_fields() {
        let base = json!({ "name": "A", "population": 10, "currencies": [{ "code": "X" }] });
        assert!(normalize_entry(&base).unwrap().is_some());

        let mut no_name = base.clone();
        no_name["name"] = json!("");
        assert_eq!(normalize_entry(&no_name), Ok(None));

        let mut no_pop = base.clone();
        no_pop.as_object_mut().unwrap().remove("population");
        assert_eq!(normalize_entry(&no_pop), Ok(None));

        let mut null_pop = base.clone();
        null_pop["population"] = Value::Null;
        assert_eq!(normalize_entry(&null_pop), Ok(None));

        let mut no_currency = base.clone();
        no_currency["currencies"] = json!([]);
        assert_eq!(normalize_entry(&no_currency), Ok(None));
    }

    #[test]
    fn malformed_population_is_an_error() {
        for raw in [json!("lots"), json!(-5), json!(12.5)] {
            let entry = json!({ "name": "A", "population": raw, "currencies": [{ "code": "X" }] });
            assert!(matches!(
                normalize_entry(&entry),
                Err(NormalizeError::InvalidPopulation { .. })
            ));
        }
    }

    #[test]
    fn whole_float_population_is_accepted() {
        let entry = json!({ "name": "A", "population": 1.0e6, "currencies": [{ "code": "X" }] });
        assert_eq!(normalize_entry(&entry).unwrap().unwrap().population, 1_000_000);
    }

    #[test]
    fn non_object_entry_is_an_error() {
        assert_eq!(normalize_entry(&json!("Nigeria")), Err(NormalizeError::NotAnObject));
    }
}
