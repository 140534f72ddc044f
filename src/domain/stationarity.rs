//! Augmented Dickey-Fuller unit-root test.
//!
//! Fits the augmented autoregression
//!
//!   Δy_t = a + γ·y_{t-1} + Σ_{j=1..p} φ_j·Δy_{t-j} + ε_t
//!
//! with a constant and `p = lag_order` lagged differences. The test statistic
//! is the t-statistic on γ. A statistic below the critical value rejects the
//! unit-root null, i.e. the series is stationary (mean-reverting).

use crate::domain::error::ScreenError;
use crate::domain::regression::{ols, OlsFit};

/// Lag order used by the screens: 1 = daily data.
pub const DEFAULT_LAG_ORDER: usize = 1;

/// Critical values at the 1% / 5% / 10% levels. Always monotonic
/// decreasing in significance: `one_pct < five_pct < ten_pct`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriticalValues {
    pub one_pct: f64,
    pub five_pct: f64,
    pub ten_pct: f64,
}

/// MacKinnon (2010) response-surface coefficients for the tau statistic with
/// constant, no trend: cv = b0 + b1/n + b2/n² + b3/n³.
const SURFACE_1PCT: [f64; 4] = [-3.43035, -6.5393, -16.786, -79.433];
const SURFACE_5PCT: [f64; 4] = [-2.86154, -2.8903, -4.234, -40.04];
const SURFACE_10PCT: [f64; 4] = [-2.56677, -1.5384, -2.809, 0.0];

fn surface(b: &[f64; 4], n: f64) -> f64 {
    b[0] + b[1] / n + b[2] / (n * n) + b[3] / (n * n * n)
}

impl CriticalValues {
    /// Critical values for `nobs` effective regression observations.
    pub fn for_sample_size(nobs: usize) -> Self {
        let n = nobs as f64;
        Self {
            one_pct: surface(&SURFACE_1PCT, n),
            five_pct: surface(&SURFACE_5PCT, n),
            ten_pct: surface(&SURFACE_10PCT, n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdfResult {
    pub statistic: f64,
    pub p_value: f64,
    pub critical_values: CriticalValues,
}

/// Smallest series length for which the t-statistic is defined: the
/// regression has `lag_order + 2` coefficients, loses `lag_order + 1`
/// leading observations to differencing and lags, and needs one residual
/// degree of freedom.
pub fn min_observations(lag_order: usize) -> usize {
    2 * lag_order + 4
}

/// Run the ADF test on a price series with the given lag order.
pub fn adf_test(closes: &[f64], lag_order: usize) -> Result<AdfResult, ScreenError> {
    let need = min_observations(lag_order);
    if closes.len() < need {
        return Err(ScreenError::InsufficientData {
            have: closes.len(),
            need,
        });
    }

    let diffs: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

    let mut rows: Vec<Vec<f64>> = Vec::with_capacity(diffs.len() - lag_order);
    let mut y: Vec<f64> = Vec::with_capacity(diffs.len() - lag_order);
    for t in lag_order..diffs.len() {
        let mut row = Vec::with_capacity(lag_order + 2);
        row.push(1.0);
        // diffs[t] = closes[t+1] - closes[t], so the lagged level is closes[t]
        row.push(closes[t]);
        for j in 1..=lag_order {
            row.push(diffs[t - j]);
        }
        rows.push(row);
        y.push(diffs[t]);
    }

    let fit: OlsFit = ols(&rows, &y)?;
    let statistic = fit.t_stat(1);
    let critical_values = CriticalValues::for_sample_size(fit.nobs);

    Ok(AdfResult {
        statistic,
        p_value: approx_p_value(statistic),
        critical_values,
    })
}

/// Asymptotic quantiles of the Dickey-Fuller tau distribution with constant
/// (Fuller 1976, table 8.5.2), as (statistic, p) knots.
const TAU_KNOTS: [(f64, f64); 9] = [
    (-3.43, 0.01),
    (-3.12, 0.025),
    (-2.86, 0.05),
    (-2.57, 0.10),
    (-1.57, 0.50),
    (-0.44, 0.90),
    (-0.07, 0.95),
    (0.23, 0.975),
    (0.60, 0.99),
];

/// Approximate p-value by piecewise-linear interpolation of the asymptotic
/// tau quantiles, clamped to [0, 1]. Informational only; classification uses
/// the critical-value table.
fn approx_p_value(statistic: f64) -> f64 {
    let (first, last) = (TAU_KNOTS[0], TAU_KNOTS[TAU_KNOTS.len() - 1]);
    if statistic <= first.0 {
        // Decay toward zero below the 1% quantile.
        return (first.1 * (statistic - first.0).exp()).clamp(0.0, 1.0);
    }
    if statistic >= last.0 {
        return (last.1 + (statistic - last.0) * 0.01).clamp(0.0, 1.0);
    }
    for pair in TAU_KNOTS.windows(2) {
        let ((x0, p0), (x1, p1)) = (pair[0], pair[1]);
        if statistic <= x1 {
            return p0 + (p1 - p0) * (statistic - x0) / (x1 - x0);
        }
    }
    last.1
}
