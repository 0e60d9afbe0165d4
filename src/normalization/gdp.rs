use rand::{thread_rng, Rng};

use crate::config::{DEFAULT_GDP_FACTOR_MAX, DEFAULT_GDP_FACTOR_MIN};

/// Source of the per-capita factor drawn once per country during a refresh.
///
/// Estimated GDP is deliberately non-deterministic; tests swap in
/// [`FixedFactor`] to make it reproducible.
pub trait GdpFactorSource: Send + Sync {
    fn per_capita_factor(&self) -> f64;
}

/// Uniform random factor in `[min, max]`.
#[derive(Debug, Clone, Copy)]
pub struct RandomFactor {
    min: f64,
    max: f64,
}

impl RandomFactor {
    /// Bounds must already be validated (`config::validate_factor_range`).
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.min, self.max)
    }
}

impl Default for RandomFactor {
    fn default() -> Self {
        Self::new(DEFAULT_GDP_FACTOR_MIN, DEFAULT_GDP_FACTOR_MAX)
    }
}

impl GdpFactorSource for RandomFactor {
    fn per_capita_factor(&self) -> f64 {
        if self.min >= self.max {
            return self.min;
        }
        thread_rng().gen_range(self.min..=self.max)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedFactor(pub f64);

impl GdpFactorSource for FixedFactor {
    fn per_capita_factor(&self) -> f64 {
        self.0
    }
}

/// A rate is usable only when it is finite and strictly positive.
pub fn usable_rate(rate: Option<f64>) -> Option<f64> {
    rate.filter(|r| r.is_finite() && *r > 0.0)
}

/// `population × factor / rate`, or 0 when the rate is unavailable.
pub fn estimate_gdp(population: i64, factor: f64, rate: Option<f64>) -> f64 {
    match usable_rate(rate) {
        Some(rate) => population as f64 * factor / rate,
        None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_factor_stays_in_bounds() {
        let src = RandomFactor::new(1000.0, 2000.0);
        for _ in 0..500 {
            let f = src.per_capita_factor();
            assert!((1000.0..=2000.0).contains(&f), "factor {f} out of range");
        }
    }

    #[test]
    fn degenerate_range_returns_min() {
        assert_eq!(RandomFactor::new(1500.0, 1500.0).per_capita_factor(), 1500.0);
    }

    #[test]
    fn gdp_uses_population_factor_and_rate() {
        assert_eq!(estimate_gdp(10, 1000.0, Some(2.0)), 5000.0);
        assert_eq!(estimate_gdp(0, 1000.0, Some(2.0)), 0.0);
    }

    #[test]
    fn unusable_rates_yield_zero() {
        assert_eq!(estimate_gdp(10, 1000.0, None), 0.0);
        assert_eq!(estimate_gdp(10, 1000.0, Some(0.0)), 0.0);
        assert_eq!(estimate_gdp(10, 1000.0, Some(-3.0)), 0.0);
        assert_eq!(estimate_gdp(10, 1000.0, Some(f64::NAN)), 0.0);
        assert_eq!(usable_rate(Some(f64::INFINITY)), None);
    }
}
