use serde_json::Value;
use tracing::warn;

use super::exchange::RateTable;
use super::store::NewCountry;
use crate::normalization::gdp::{estimate_gdp, usable_rate, GdpFactorSource};
use crate::normalization::{normalize_entry, NormalizeError};

/// Outcome of one entry.
#[derive(Debug, PartialEq)]
pub enum Transformed {
    Record(NewCountry),
    /// Missing name, population or currency.
    Skipped,
}

/// Turn one raw catalog entry into at most one record.
pub fn transform_entry(
    entry: &Value,
    rates: &RateTable,
    factors: &dyn GdpFactorSource,
) -> Result<Transformed, NormalizeError> {
    let Some(fields) = normalize_entry(entry)? else {
        return Ok(Transformed::Skipped);
    };

    let exchange_rate = usable_rate(rates.get(&fields.currency_code).copied());
    let estimated_gdp = match exchange_rate {
        Some(_) => estimate_gdp(fields.population, factors.per_capita_factor(), exchange_rate),
        None => 0.0,
    };

    Ok(Transformed::Record(NewCountry {
        name: fields.name,
        capital: fields.capital,
        region: fields.region,
        population: fields.population,
        currency_code: fields.currency_code,
        exchange_rate,
        estimated_gdp,
        flag_url: fields.flag_url,
    }))
}

#[derive(Debug, Default)]
pub struct TransformBatch {
    pub records: Vec<NewCountry>,
    pub skipped: usize,
    pub failed: usize,
}

/// Transform a whole catalog. Malformed entries are logged and counted, never fatal.
pub fn transform_all(
    entries: &[Value],
    rates: &RateTable,
    factors: &dyn GdpFactorSource,
) -> TransformBatch {
    let mut batch = TransformBatch::default();
    for (index, entry) in entries.iter().enumerate() {
        match transform_entry(entry, rates, factors) {
            Ok(Transformed::Record(record)) => batch.records.push(record),
            Ok(Transformed::Skipped) => batch.skipped += 1,
            Err(e) => {
                warn!(index, error = %e, "skipping malformed catalog entry");
                batch.failed += 1;
            }
        }
    }
    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalization::gdp::{FixedFactor, RandomFactor};
    use serde_json::json;

    fn rates(pairs: &[(&str, f64)]) -> RateTable {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn record(t: Transformed) -> NewCountry {
        match t {
            Transformed::Record(r) => r,
            Transformed::Skipped => panic!("expected a record"),
        }
    }

    #[test]
    fn computes_gdp_with_fixed_factor() {
        let entry = json!({ "name": "A", "population": 10, "currencies": [{ "code": "X" }] });
        let r = record(transform_entry(&entry, &rates(&[("X", 2.0)]), &FixedFactor(1500.0)).unwrap());
        assert_eq!(r.exchange_rate, Some(2.0));
        assert_eq!(r.estimated_gdp, 7500.0);
        assert_eq!(r.currency_code, "X");
    }

    #[test]
    fn random_gdp_lies_within_factor_range() {
        let entry = json!({ "name": "A", "population": 10, "currencies": [{ "code": "X" }] });
        let table = rates(&[("X", 2.0)]);
        for _ in 0..50 {
            let r = record(transform_entry(&entry, &table, &RandomFactor::new(1000.0, 2000.0)).unwrap());
            let factor = r.estimated_gdp * 2.0 / 10.0;
            assert!((999.999..=2000.001).contains(&factor), "factor {factor}");
            assert!(r.estimated_gdp >= 0.0);
        }
    }

    #[test]
    fn missing_or_zero_rate_keeps_record_with_zero_gdp() {
        let entry = json!({ "name": "A", "population": 10, "currencies": [{ "code": "X" }] });
        for table in [rates(&[]), rates(&[("X", 0.0)]), rates(&[("X", -1.0)])] {
            let r = record(transform_entry(&entry, &table, &FixedFactor(1500.0)).unwrap());
            assert_eq!(r.exchange_rate, None);
            assert_eq!(r.estimated_gdp, 0.0);
        }
    }

    #[test]
    fn batch_counts_records_skips_and_failures() {
        let entries = vec![
            json!({ "name": "A", "population": 10, "currencies": [{ "code": "X" }] }),
            json!({ "name": "", "population": 10, "currencies": [{ "code": "X" }] }),
            json!({ "name": "C", "currencies": [{ "code": "X" }] }),
            json!({ "name": "D", "population": 10 }),
            json!({ "name": "E", "population": "many", "currencies": [{ "code": "X" }] }),
            json!(42),
            json!({ "name": "G", "population": 5, "currencies": { "Y": {} } }),
        ];
        let batch = transform_all(&entries, &rates(&[("X", 2.0)]), &FixedFactor(1000.0));
        let names: Vec<_> = batch.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["A", "G"]);
        assert_eq!(batch.skipped, 3);
        assert_eq!(batch.failed, 2);
        assert_eq!(batch.records[1].estimated_gdp, 0.0);
    }
}
