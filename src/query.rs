//! In-memory filtering and sorting over a full country listing.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::database_ops::store::Country;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Gdp,
    Population,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub key: SortKey,
    pub direction: Direction,
}

impl SortOrder {
    pub const ACCEPTED: &'static [&'static str] =
        &["gdp_desc", "gdp_asc", "population_desc", "population_asc"];

    pub const fn new(key: SortKey, direction: Direction) -> Self {
        Self { key, direction }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSort(pub String);

impl fmt::Display for UnknownSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unsupported sort {:?}; expected one of {}",
            self.0,
            SortOrder::ACCEPTED.join(", ")
        )
    }
}

impl std::error::Error for UnknownSort {}

impl FromStr for SortOrder {
    type Err = UnknownSort;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let token = raw.trim().to_ascii_lowercase();
        let order = match token.as_str() {
            "gdp_desc" | "estimated_gdp_desc" => Self::new(SortKey::Gdp, Direction::Desc),
            "gdp_asc" | "estimated_gdp_asc" => Self::new(SortKey::Gdp, Direction::Asc),
            "population_desc" => Self::new(SortKey::Population, Direction::Desc),
            "population_asc" => Self::new(SortKey::Population, Direction::Asc),
            _ => return Err(UnknownSort(raw.to_string())),
        };
        Ok(order)
    }
}

/// Filters compose with AND; `None` means "no constraint".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountryQuery {
    pub region: Option<String>,
    pub currency: Option<String>,
    pub sort: Option<SortOrder>,
}

impl CountryQuery {
    pub fn matches(&self, country: &Country) -> bool {
        let region_ok = self
            .region
            .as_deref()
            .map_or(true, |r| country.region.as_deref() == Some(r));
        let currency_ok = self
            .currency
            .as_deref()
            .map_or(true, |c| country.currency_code == c);
        region_ok && currency_ok
    }

    pub fn apply(&self, countries: Vec<Country>) -> Vec<Country> {
        let mut out: Vec<Country> = countries.into_iter().filter(|c| self.matches(c)).collect();
        if let Some(order) = self.sort {
            sort_countries(&mut out, order);
        }
        out
    }
}

/// Stable sort; absent values count as 0.
pub fn sort_countries(countries: &mut [Country], order: SortOrder) {
    countries.sort_by(|a, b| {
        let ord = match order.key {
            SortKey::Gdp => gdp_value(a).total_cmp(&gdp_value(b)),
            SortKey::Population => a.population.max(0).cmp(&b.population.max(0)),
        };
        match order.direction {
            Direction::Asc => ord,
            Direction::Desc => ord.reverse(),
        }
    });
}

fn gdp_value(c: &Country) -> f64 {
    if c.estimated_gdp.is_finite() {
        c.estimated_gdp
    } else {
        0.0
    }
}

/// Highest estimated GDP first.
pub fn compare_gdp_desc(a: &Country, b: &Country) -> Ordering {
    gdp_value(b).total_cmp(&gdp_value(a))
}
