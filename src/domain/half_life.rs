//! Half-life of mean reversion.
//!
//! Fits the Ornstein-Uhlenbeck-style autoregression
//!
//!   Δy_t = a + b·y_{t-1} + ε_t
//!
//! by OLS; `half_life = -ln(2) / b`. A negative b is the speed of reversion;
//! b >= 0 (unit root or explosive) yields a non-positive or non-finite
//! half-life, which is returned raw so the caller's `half_life > 0` check can
//! discard it. The first unlagged observation is dropped from the regression.

use crate::domain::error::ScreenError;
use crate::domain::regression::linear_fit;

/// Pass threshold used by the screens, in trading days.
pub const DEFAULT_THRESHOLD: f64 = 50.0;

pub const MIN_OBSERVATIONS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfLifeResult {
    pub half_life: f64,
}

impl HalfLifeResult {
    /// Only positive half-lives describe a mean-reverting series.
    pub fn is_mean_reverting(&self) -> bool {
        self.half_life > 0.0
    }
}

pub fn half_life(closes: &[f64]) -> Result<HalfLifeResult, ScreenError> {
    if closes.len() < MIN_OBSERVATIONS {
        return Err(ScreenError::InsufficientData {
            have: closes.len(),
            need: MIN_OBSERVATIONS,
        });
    }

    let lagged = &closes[..closes.len() - 1];
    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

    let fit = linear_fit(lagged, &deltas)?;
    Ok(HalfLifeResult {
        half_life: -std::f64::consts::LN_2 / fit.slope,
    })
}
