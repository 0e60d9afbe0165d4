use serde_json::Value;

/// Shapes the upstream `currencies` field is known to arrive in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencyShape {
    /// `[{ "code": "NGN", "name": "...", "symbol": "₦" }]` (restcountries v2).
    ListOfObjects,
    /// `{ "NGN": { "name": "...", "symbol": "₦" } }` (restcountries v3.1).
    KeyedByCode,
}

impl CurrencyShape {
    pub fn detect(value: &Value) -> Option<Self> {
        match value {
            Value::Array(_) => Some(Self::ListOfObjects),
            Value::Object(_) => Some(Self::KeyedByCode),
            _ => None,
        }
    }
}

/// Resolve the single representative currency code of a country.
///
/// The first non-empty code in source order wins. Anything that is not one of
/// the [`CurrencyShape`]s resolves to `None`.
pub fn primary_currency_code(currencies: &Value) -> Option<String> {
    let code = match CurrencyShape::detect(currencies)? {
        CurrencyShape::ListOfObjects => currencies
            .as_array()?
            .iter()
            .filter_map(|entry| entry.get("code").and_then(Value::as_str))
            .map(str::trim)
            .find(|code| !code.is_empty()),
        CurrencyShape::KeyedByCode => currencies
            .as_object()?
            .keys()
            .map(|code| code.trim())
            .find(|code| !code.is_empty()),
    }?;
    Some(code.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_shape_takes_first_code() {
        let v = json!([{ "code": "NGN", "name": "Naira" }, { "code": "USD" }]);
        assert_eq!(primary_currency_code(&v).as_deref(), Some("NGN"));
    }

    #[test]
    fn list_shape_skips_entries_without_code() {
        let v = json!([{ "name": "Unnamed" }, { "code": "  " }, { "code": "EUR" }]);
        assert_eq!(primary_currency_code(&v).as_deref(), Some("EUR"));
    }

    #[test]
    fn keyed_shape_keeps_source_order() {
        let v = json!({ "ZAR": { "name": "Rand" }, "BWP": { "name": "Pula" } });
        assert_eq!(primary_currency_code(&v).as_deref(), Some("ZAR"));
    }

    #[test]
    fn unsupported_or_empty_shapes_resolve_to_none() {
        assert_eq!(primary_currency_code(&json!([])), None);
        assert_eq!(primary_currency_code(&json!({})), None);
        assert_eq!(primary_currency_code(&json!("USD")), None);
        assert_eq!(primary_currency_code(&Value::Null), None);
        assert_eq!(CurrencyShape::detect(&json!(42)), None);
    }
}
