//! Screening pipeline: per-ticker fetch → window → diagnose → classify.
//!
//! Exactly one diagnostic runs per screen. Per-ticker estimator failures
//! (insufficient data, numeric domain) are recorded and the ticker skipped;
//! data-source failures abort the run.

use crate::domain::error::ScreenError;
use crate::domain::half_life::{half_life, HalfLifeResult};
use crate::domain::hurst::hurst_exponent;
use crate::domain::series::DateWindow;
use crate::domain::stationarity::adf_test;
use crate::domain::summary::RunSummary;
use crate::ports::series_port::SeriesPort;

pub const ADF_PASSED_1PCT: &str = "passed at 1%";
pub const ADF_PASSED_5PCT: &str = "passed at 5%";
pub const ADF_FAILED: &str = "failed";

pub const HURST_MEAN_REVERTING: &str = "mean-reverting";
pub const HURST_NOT_MEAN_REVERTING: &str = "not mean-reverting";

pub const HALF_LIFE_PASSED: &str = "passed";
pub const HALF_LIFE_FAILED: &str = "failed";
pub const HALF_LIFE_DISCARDED: &str = "discarded";

/// The one diagnostic a screen runs, with its thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Diagnostic {
    Adf { lag_order: usize },
    Hurst,
    HalfLife { threshold: f64 },
}

/// A classified, successfully diagnosed ticker.
#[derive(Debug, Clone, Copy)]
struct Classified {
    value: f64,
    label: &'static str,
    /// Whether the value enters the run distribution. Non-positive
    /// half-lives are discarded from all further statistics.
    counted: bool,
}

impl Diagnostic {
    /// Bucket labels in classification priority order.
    pub fn bucket_labels(&self) -> &'static [&'static str] {
        match self {
            Diagnostic::Adf { .. } => &[ADF_PASSED_1PCT, ADF_PASSED_5PCT, ADF_FAILED],
            Diagnostic::Hurst => &[HURST_MEAN_REVERTING, HURST_NOT_MEAN_REVERTING],
            Diagnostic::HalfLife { .. } => {
                &[HALF_LIFE_PASSED, HALF_LIFE_FAILED, HALF_LIFE_DISCARDED]
            }
        }
    }

    fn diagnose(&self, closes: &[f64]) -> Result<Classified, ScreenError> {
        match *self {
            Diagnostic::Adf { lag_order } => {
                let result = adf_test(closes, lag_order)?;
                // Ordered tiers: strongest significance wins.
                let tiers = [
                    (result.critical_values.one_pct, ADF_PASSED_1PCT),
                    (result.critical_values.five_pct, ADF_PASSED_5PCT),
                ];
                let label = tiers
                    .iter()
                    .find(|(threshold, _)| result.statistic < *threshold)
                    .map(|(_, label)| *label)
                    .unwrap_or(ADF_FAILED);
                Ok(Classified {
                    value: result.statistic,
                    label,
                    counted: true,
                })
            }
            Diagnostic::Hurst => {
                let result = hurst_exponent(closes)?;
                let label = if result.exponent < 0.5 {
                    HURST_MEAN_REVERTING
                } else {
                    HURST_NOT_MEAN_REVERTING
                };
                Ok(Classified {
                    value: result.exponent,
                    label,
                    counted: true,
                })
            }
            Diagnostic::HalfLife { threshold } => {
                let result: HalfLifeResult = half_life(closes)?;
                let (label, counted) = if !result.is_mean_reverting() {
                    (HALF_LIFE_DISCARDED, false)
                } else if result.half_life <= threshold {
                    (HALF_LIFE_PASSED, true)
                } else {
                    (HALF_LIFE_FAILED, true)
                };
                Ok(Classified {
                    value: result.half_life,
                    label,
                    counted,
                })
            }
        }
    }

    fn progress_line(&self, ticker: &str, c: &Classified) -> String {
        match self {
            Diagnostic::Adf { .. } => match c.label {
                ADF_PASSED_1PCT => format!("{ticker} passed on 1% statistic {:.6}", c.value),
                ADF_PASSED_5PCT => format!("{ticker} passed on 5% statistic {:.6}", c.value),
                _ => format!("{ticker} failed."),
            },
            Diagnostic::Hurst => match c.label {
                HURST_MEAN_REVERTING => {
                    format!("{ticker} exhibits mean reversion with HE {:.6}", c.value)
                }
                _ => format!("{ticker} does not exhibit mean reversion."),
            },
            Diagnostic::HalfLife { .. } => format!("{ticker} Halflife: {:.4}", c.value),
        }
    }
}

/// Tickers grouped under one classification tier. `values` holds the
/// diagnostic values that entered the distribution from this bucket.
#[derive(Debug, Clone)]
pub struct Bucket {
    pub label: &'static str,
    pub tickers: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug)]
pub struct TickerFailure {
    pub ticker: String,
    pub error: ScreenError,
}

#[derive(Debug)]
pub struct ScreenReport {
    pub buckets: Vec<Bucket>,
    pub distribution: Vec<f64>,
    pub summary: RunSummary,
    pub failures: Vec<TickerFailure>,
}

impl ScreenReport {
    pub fn bucket(&self, label: &str) -> Option<&Bucket> {
        self.buckets.iter().find(|b| b.label == label)
    }

    pub fn tickers_in(&self, label: &str) -> &[String] {
        self.bucket(label).map(|b| b.tickers.as_slice()).unwrap_or(&[])
    }
}

/// Run one screen over a ticker universe.
///
/// Fetch errors are fatal; estimator errors skip the ticker. Every ticker
/// that diagnoses successfully lands in exactly one bucket.
pub fn run_screen(
    port: &dyn SeriesPort,
    tickers: &[String],
    window: &DateWindow,
    diagnostic: &Diagnostic,
) -> Result<ScreenReport, ScreenError> {
    let mut buckets: Vec<Bucket> = diagnostic
        .bucket_labels()
        .iter()
        .copied()
        .map(|label| Bucket {
            label,
            tickers: Vec::new(),
            values: Vec::new(),
        })
        .collect();
    let mut distribution = Vec::new();
    let mut failures = Vec::new();

    for ticker in tickers {
        let series = port.fetch_series(ticker, window)?;
        let windowed = series.restrict(window);

        match diagnostic.diagnose(&windowed.closes()) {
            Ok(classified) => {
                eprintln!("{}", diagnostic.progress_line(ticker, &classified));
                let bucket = buckets
                    .iter_mut()
                    .find(|b| b.label == classified.label)
                    .expect("diagnose returned a label outside bucket_labels");
                bucket.tickers.push(ticker.clone());
                if classified.counted {
                    bucket.values.push(classified.value);
                    distribution.push(classified.value);
                }
            }
            Err(e) if e.is_per_ticker() => {
                eprintln!("Failed at {ticker} ({e})");
                failures.push(TickerFailure {
                    ticker: ticker.clone(),
                    error: e,
                });
            }
            Err(e) => return Err(e),
        }
    }

    let summary = RunSummary::compute(&distribution);
    Ok(ScreenReport {
        buckets,
        distribution,
        summary,
        failures,
    })
}
