//! CSV file data adapter.
//!
//! One `<TICKER>.csv` file per ticker under a base directory, with a header
//! row and `date,adj_close` columns. Useful for local runs without a
//! database and for seeding tests.

use crate::domain::error::ScreenError;
use crate::domain::series::{DateWindow, PricePoint, PriceSeries};
use crate::ports::series_port::SeriesPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{ticker}.csv"))
    }

    fn read_points(&self, ticker: &str) -> Result<Vec<PricePoint>, ScreenError> {
        let path = self.csv_path(ticker);
        let content = fs::read_to_string(&path).map_err(|e| ScreenError::Database {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut points = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| ScreenError::Database {
                reason: format!("CSV parse error: {e}"),
            })?;

            let date_str = record.get(0).ok_or_else(|| ScreenError::Database {
                reason: "missing date column".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                ScreenError::Database {
                    reason: format!("invalid date format: {e}"),
                }
            })?;

            let close: f64 = record
                .get(1)
                .ok_or_else(|| ScreenError::Database {
                    reason: "missing adj_close column".into(),
                })?
                .parse()
                .map_err(|e| ScreenError::Database {
                    reason: format!("invalid adj_close value: {e}"),
                })?;

            points.push(PricePoint { date, close });
        }

        Ok(points)
    }
}

impl SeriesPort for CsvAdapter {
    fn fetch_series(
        &self,
        ticker: &str,
        window: &DateWindow,
    ) -> Result<PriceSeries, ScreenError> {
        let points = self
            .read_points(ticker)?
            .into_iter()
            .filter(|p| p.date >= window.start() && p.date <= window.end())
            .collect();
        Ok(PriceSeries::new(ticker, points))
    }

    fn tickers_with_data_on(&self, date: NaiveDate) -> Result<Vec<String>, ScreenError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| ScreenError::Database {
            reason: format!("failed to read {}: {}", self.base_path.display(), e),
        })?;

        let mut tickers = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ScreenError::Database {
                reason: e.to_string(),
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }
            let Some(ticker) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if self.read_points(ticker)?.iter().any(|p| p.date == date) {
                tickers.push(ticker.to_string());
            }
        }

        tickers.sort();
        Ok(tickers)
    }
}
