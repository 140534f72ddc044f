//! Hurst exponent estimator.
//!
//! For each lag k, `tau_k = sqrt(pop_std(series[k..] - series[..n-k]))`; the
//! exponent is twice the slope of the least-squares line through
//! `(ln k, ln tau_k)`.
//!
//! H < 0.5 — mean-reverting (anti-persistent)
//! H = 0.5 — random walk
//! H > 0.5 — trending (persistent)

use crate::domain::error::ScreenError;
use crate::domain::regression::{linear_fit, population_std};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HurstResult {
    pub exponent: f64,
}

/// The lag range the screens use: 2..100, matching daily price histories.
pub fn default_lags() -> Vec<usize> {
    (2..100).collect()
}

/// Estimate the Hurst exponent over the default lag range.
pub fn hurst_exponent(closes: &[f64]) -> Result<HurstResult, ScreenError> {
    hurst_exponent_with_lags(closes, &default_lags())
}

/// Estimate the Hurst exponent over an explicit lag set.
///
/// Requires `closes.len() > max(lags) + 1`. A zero `tau_k` (the difference
/// series at some lag has no variance) fails with `NumericDomain` instead of
/// feeding `ln(0)` into the regression.
pub fn hurst_exponent_with_lags(
    closes: &[f64],
    lags: &[usize],
) -> Result<HurstResult, ScreenError> {
    let max_lag = lags.iter().copied().max().unwrap_or(0);
    let need = max_lag + 2;
    if closes.len() < need {
        return Err(ScreenError::InsufficientData {
            have: closes.len(),
            need,
        });
    }

    let mut log_lag = Vec::with_capacity(lags.len());
    let mut log_tau = Vec::with_capacity(lags.len());
    for &k in lags {
        let diffs: Vec<f64> = closes[k..]
            .iter()
            .zip(&closes[..closes.len() - k])
            .map(|(a, b)| a - b)
            .collect();
        let tau = population_std(&diffs).sqrt();
        if !(tau > 0.0) || !tau.is_finite() {
            return Err(ScreenError::NumericDomain {
                reason: format!("zero-variance difference series at lag {k}"),
            });
        }
        log_lag.push((k as f64).ln());
        log_tau.push(tau.ln());
    }

    let fit = linear_fit(&log_lag, &log_tau)?;
    Ok(HurstResult {
        exponent: 2.0 * fit.slope,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// xorshift64 — deterministic noise for reproducible series.
    struct Rng(u64);

    impl Rng {
        fn next_uniform(&mut self) -> f64 {
            self.0 ^= self.0 << 13;
            self.0 ^= self.0 >> 7;
            self.0 ^= self.0 << 17;
            self.0 as f64 / u64::MAX as f64 - 0.5
        }
    }

    fn random_walk(seed: u64, len: usize) -> Vec<f64> {
        let mut rng = Rng(seed);
        let mut level = 100.0;
        (0..len)
            .map(|_| {
                level += rng.next_uniform();
                level
            })
            .collect()
    }

    fn ar1(phi: f64, seed: u64, len: usize) -> Vec<f64> {
        let mut rng = Rng(seed);
        let mut x = 0.0;
        (0..len)
            .map(|_| {
                x = phi * x + rng.next_uniform();
                100.0 + x
            })
            .collect()
    }

    #[test]
    fn random_walk_is_near_one_half() {
        let seeds = [3, 7, 19, 41, 97, 131, 257, 509];
        let mut sum = 0.0;
        for seed in seeds {
            let h = hurst_exponent(&random_walk(seed, 1500)).unwrap().exponent;
            assert!((0.25..0.75).contains(&h), "seed {seed}: H = {h}");
            sum += h;
        }
        let avg = sum / seeds.len() as f64;
        assert!((avg - 0.5).abs() < 0.15, "average H = {avg}");
    }

    #[test]
    fn anti_persistent_series_is_below_one_half() {
        let h = hurst_exponent(&ar1(-0.9, 5, 1500)).unwrap().exponent;
        assert!(h < 0.4, "H = {h}");
    }

    #[test]
    fn trending_series_is_above_one_half() {
        let mut level = 100.0;
        let series: Vec<f64> = (0..500)
            .map(|i| {
                level += 0.5 + 0.1 * (i as f64).sin().abs();
                level
            })
            .collect();
        let h = hurst_exponent(&series).unwrap().exponent;
        assert!(h > 0.6, "H = {h}");
    }

    #[test]
    fn constant_series_is_numeric_domain() {
        let series = vec![50.0; 200];
        assert!(matches!(
            hurst_exponent(&series),
            Err(ScreenError::NumericDomain { .. })
        ));
    }

    #[test]
    fn boundary_length_exact_minimum() {
        let lags: Vec<usize> = (2..=10).collect();
        let series = random_walk(1, 12);
        assert!(hurst_exponent_with_lags(&series, &lags).is_ok());
    }

    #[test]
    fn boundary_length_one_short() {
        let lags: Vec<usize> = (2..=10).collect();
        let series = random_walk(1, 11);
        assert!(matches!(
            hurst_exponent_with_lags(&series, &lags),
            Err(ScreenError::InsufficientData { have: 11, need: 12 })
        ));
    }

    #[test]
    fn evaluation_is_idempotent() {
        let series = random_walk(23, 400);
        let a = hurst_exponent(&series).unwrap();
        let b = hurst_exponent(&series).unwrap();
        assert_eq!(a.exponent.to_bits(), b.exponent.to_bits());
    }
}
