//! Shared regression and descriptive-statistic helpers.
//!
//! The estimators only need small regressions (at most a handful of
//! regressors), so ordinary least squares is solved directly: centered sums
//! for the single-regressor case, normal equations with a Gauss-Jordan
//! inverse for the general case.

use crate::domain::error::ScreenError;

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divisor n, not n-1).
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Result of a single-regressor least-squares line fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
}

/// Fit `y = intercept + slope * x` by ordinary least squares.
///
/// slope = Σ((x-x̄)(y-ȳ)) / Σ((x-x̄)²)
///
/// Fails with `NumericDomain` when the x values carry no variance.
pub fn linear_fit(xs: &[f64], ys: &[f64]) -> Result<LineFit, ScreenError> {
    debug_assert_eq!(xs.len(), ys.len());
    if xs.len() < 2 {
        return Err(ScreenError::InsufficientData {
            have: xs.len(),
            need: 2,
        });
    }

    let x_mean = mean(xs);
    let y_mean = mean(ys);

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - x_mean;
        numerator += dx * (y - y_mean);
        denominator += dx * dx;
    }

    if denominator.abs() < f64::EPSILON {
        return Err(ScreenError::NumericDomain {
            reason: "regressor has zero variance".into(),
        });
    }

    let slope = numerator / denominator;
    Ok(LineFit {
        slope,
        intercept: y_mean - slope * x_mean,
    })
}

/// Result of a multi-regressor OLS fit.
#[derive(Debug, Clone)]
pub struct OlsFit {
    pub coefficients: Vec<f64>,
    pub std_errors: Vec<f64>,
    pub nobs: usize,
}

impl OlsFit {
    /// t-statistic of coefficient `j` (coefficient over its standard error).
    pub fn t_stat(&self, j: usize) -> f64 {
        self.coefficients[j] / self.std_errors[j]
    }
}

/// Ordinary least squares for `y = X b` with `rows` as the rows of `X`.
///
/// Requires at least one residual degree of freedom (`n > k`). Solved via the
/// normal equations; a singular `X'X` (collinear or degenerate regressors)
/// fails with `NumericDomain`.
pub fn ols(rows: &[Vec<f64>], y: &[f64]) -> Result<OlsFit, ScreenError> {
    debug_assert_eq!(rows.len(), y.len());
    let n = rows.len();
    let k = rows.first().map(Vec::len).unwrap_or(0);
    if k == 0 || n <= k {
        return Err(ScreenError::InsufficientData { have: n, need: k + 1 });
    }

    // X'X and X'y
    let mut xtx = vec![vec![0.0_f64; k]; k];
    let mut xty = vec![0.0_f64; k];
    for (row, &yi) in rows.iter().zip(y) {
        debug_assert_eq!(row.len(), k);
        for i in 0..k {
            xty[i] += row[i] * yi;
            for j in 0..k {
                xtx[i][j] += row[i] * row[j];
            }
        }
    }

    let inverse = invert(&xtx).ok_or_else(|| ScreenError::NumericDomain {
        reason: "singular design matrix".into(),
    })?;

    let coefficients: Vec<f64> = (0..k)
        .map(|i| (0..k).map(|j| inverse[i][j] * xty[j]).sum())
        .collect();

    let rss: f64 = rows
        .iter()
        .zip(y)
        .map(|(row, &yi)| {
            let fitted: f64 = row.iter().zip(&coefficients).map(|(x, b)| x * b).sum();
            let r = yi - fitted;
            r * r
        })
        .sum();

    let sigma2 = rss / (n - k) as f64;
    let std_errors: Vec<f64> = (0..k).map(|i| (sigma2 * inverse[i][i]).sqrt()).collect();

    if std_errors.iter().any(|se| !se.is_finite() || *se <= 0.0) {
        return Err(ScreenError::NumericDomain {
            reason: "degenerate regression: zero residual variance".into(),
        });
    }

    Ok(OlsFit {
        coefficients,
        std_errors,
        nobs: n,
    })
}

/// Gauss-Jordan inverse with partial pivoting. Returns `None` when singular.
fn invert(matrix: &[Vec<f64>]) -> Option<Vec<Vec<f64>>> {
    let k = matrix.len();
    // Augmented [A | I]
    let mut aug: Vec<Vec<f64>> = matrix
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut r = row.clone();
            r.extend((0..k).map(|j| if i == j { 1.0 } else { 0.0 }));
            r
        })
        .collect();

    for col in 0..k {
        let pivot_row = (col..k).max_by(|&a, &b| {
            aug[a][col]
                .abs()
                .partial_cmp(&aug[b][col].abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;
        if aug[pivot_row][col].abs() < 1e-12 {
            return None;
        }
        aug.swap(col, pivot_row);

        let pivot = aug[col][col];
        for v in aug[col].iter_mut() {
            *v /= pivot;
        }

        let pivot_vals = aug[col].clone();
        for row in 0..k {
            if row == col {
                continue;
            }
            let factor = aug[row][col];
            if factor == 0.0 {
                continue;
            }
            for j in 0..2 * k {
                aug[row][j] -= factor * pivot_vals[j];
            }
        }
    }

    Some(aug.into_iter().map(|row| row[k..].to_vec()).collect())
}
