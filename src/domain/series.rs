//! Price series and date-window types.

use crate::domain::error::ScreenError;
use chrono::NaiveDate;

/// One (date, adjusted close) sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// A date range used to restrict a series. Invariant: `start < end`.
///
/// Restriction is open-closed: a point survives when
/// `date > start && date <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ScreenError> {
        if start >= end {
            return Err(ScreenError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date > self.start && date <= self.end
    }
}

/// Ordered price history for one ticker: ascending by date, dates unique.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    pub ticker: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from repository rows. Rows are sorted by date and
    /// de-duplicated (first sample per date wins) rather than trusting
    /// fetch order.
    pub fn new(ticker: impl Into<String>, mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.date);
        points.dedup_by_key(|p| p.date);
        Self {
            ticker: ticker.into(),
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Closing prices in date order.
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    /// A new series containing only the points inside `window`.
    pub fn restrict(&self, window: &DateWindow) -> PriceSeries {
        PriceSeries {
            ticker: self.ticker.clone(),
            points: self
                .points
                .iter()
                .copied()
                .filter(|p| window.contains(p.date))
                .collect(),
        }
    }
}
