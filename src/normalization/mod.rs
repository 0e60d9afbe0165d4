// Upstream payload normalization: country entries, currency codes, GDP estimation.

pub mod country;
pub mod currency;
pub mod gdp;

pub use country::{normalize_entry, NormalizeError, NormalizedCountry};
pub use currency::{primary_currency_code, CurrencyShape};
pub use gdp::{estimate_gdp, FixedFactor, GdpFactorSource, RandomFactor};
