#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use mrscreen::domain::error::ScreenError;
use mrscreen::domain::series::{DateWindow, PricePoint, PriceSeries};
use mrscreen::ports::series_port::SeriesPort;
use std::collections::HashMap;

pub struct MockSeriesPort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
}

impl MockSeriesPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_series(mut self, ticker: &str, points: Vec<PricePoint>) -> Self {
        self.data.insert(ticker.to_string(), points);
        self
    }

    pub fn with_closes(self, ticker: &str, closes: &[f64]) -> Self {
        self.with_series(ticker, daily_points(closes))
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl SeriesPort for MockSeriesPort {
    fn fetch_series(
        &self,
        ticker: &str,
        _window: &DateWindow,
    ) -> Result<PriceSeries, ScreenError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(ScreenError::Database {
                reason: reason.clone(),
            });
        }
        Ok(PriceSeries::new(
            ticker,
            self.data.get(ticker).cloned().unwrap_or_default(),
        ))
    }

    fn tickers_with_data_on(&self, _date: NaiveDate) -> Result<Vec<String>, ScreenError> {
        let mut tickers: Vec<String> = self.data.keys().cloned().collect();
        tickers.sort();
        Ok(tickers)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Daily points starting 2020-01-01, one close per calendar day.
pub fn daily_points(closes: &[f64]) -> Vec<PricePoint> {
    let start = date(2020, 1, 1);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PricePoint {
            date: start + Duration::days(i as i64),
            close,
        })
        .collect()
}

/// A window covering everything `daily_points` can generate.
pub fn wide_window() -> DateWindow {
    DateWindow::new(date(2019, 12, 31), date(2030, 1, 1)).unwrap()
}

/// xorshift64 — deterministic noise for reproducible series.
pub struct Rng(pub u64);

impl Rng {
    pub fn next_unit(&mut self) -> f64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0 as f64 / u64::MAX as f64
    }

    pub fn next_uniform(&mut self) -> f64 {
        self.next_unit() - 0.5
    }

    pub fn next_gaussian(&mut self) -> f64 {
        let u1 = self.next_unit().max(1e-12);
        let u2 = self.next_unit();
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }
}

pub fn random_walk(seed: u64, len: usize) -> Vec<f64> {
    let mut rng = Rng(seed);
    let mut level = 100.0;
    (0..len)
        .map(|_| {
            level += rng.next_uniform();
            level
        })
        .collect()
}

pub fn ar1(phi: f64, seed: u64, len: usize) -> Vec<f64> {
    let mut rng = Rng(seed);
    let mut x = 0.0;
    (0..len)
        .map(|_| {
            x = phi * x + rng.next_uniform();
            100.0 + x
        })
        .collect()
}

/// Discrete OU process: x_t = x_{t-1} + theta·(mu - x_{t-1}) + noise.
pub fn ou_process(theta: f64, seed: u64, len: usize) -> Vec<f64> {
    let mut rng = Rng(seed);
    let mu = 100.0;
    let mut x = mu;
    (0..len)
        .map(|_| {
            x += theta * (mu - x) + 0.5 * rng.next_gaussian();
            x
        })
        .collect()
}

pub fn constant_series(value: f64, len: usize) -> Vec<f64> {
    vec![value; len]
}

/// Deterministic upward drift with varying increments (Hurst well above 0.5).
pub fn trending_series(len: usize) -> Vec<f64> {
    let mut level = 100.0;
    (0..len)
        .map(|i| {
            level += 0.5 + 0.1 * (i as f64).sin().abs();
            level
        })
        .collect()
}
