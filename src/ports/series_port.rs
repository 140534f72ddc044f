//! Price-series access port trait.

use crate::domain::error::ScreenError;
use crate::domain::series::{DateWindow, PriceSeries};
use chrono::NaiveDate;

pub trait SeriesPort {
    /// Price history for one ticker over a date window, ascending by date.
    fn fetch_series(&self, ticker: &str, window: &DateWindow)
        -> Result<PriceSeries, ScreenError>;

    /// Tickers with at least one price sample on the given date. Used to
    /// build the live screening universe.
    fn tickers_with_data_on(&self, date: NaiveDate) -> Result<Vec<String>, ScreenError>;
}
