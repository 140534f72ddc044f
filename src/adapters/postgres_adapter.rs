//! PostgreSQL data adapter for a securities-master database.

use crate::domain::error::ScreenError;
use crate::domain::series::{DateWindow, PricePoint, PriceSeries};
use crate::ports::config_port::ConfigPort;
use crate::ports::series_port::SeriesPort;
use chrono::NaiveDate;
use postgres::{Client, NoTls};
use std::cell::RefCell;

pub struct PostgresAdapter {
    client: RefCell<Client>,
}

impl PostgresAdapter {
    /// Connect using the [database] host / user / password / dbname keys.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, ScreenError> {
        let get = |key: &str| {
            config
                .get_string("database", key)
                .ok_or_else(|| ScreenError::ConfigMissing {
                    section: "database".into(),
                    key: key.into(),
                })
        };
        let host = get("host")?;
        let user = get("user")?;
        let password = get("password")?;
        let dbname = get("dbname")?;

        let conninfo =
            format!("host={host} user={user} password={password} dbname={dbname}");

        let client = Client::connect(&conninfo, NoTls).map_err(|e| ScreenError::Database {
            reason: e.to_string(),
        })?;

        Ok(Self {
            client: RefCell::new(client),
        })
    }
}

impl SeriesPort for PostgresAdapter {
    fn fetch_series(
        &self,
        ticker: &str,
        window: &DateWindow,
    ) -> Result<PriceSeries, ScreenError> {
        let query = "SELECT date_price, adj_close_price::double precision
                     FROM daily_data
                     INNER JOIN symbol ON symbol.id = daily_data.stock_id
                     WHERE symbol.ticker = $1 AND date_price >= $2 AND date_price <= $3
                     ORDER BY date_price ASC";

        let start = window.start();
        let end = window.end();
        let rows = self
            .client
            .borrow_mut()
            .query(query, &[&ticker, &start, &end])
            .map_err(|e| ScreenError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        let points: Vec<PricePoint> = rows
            .into_iter()
            .map(|row| {
                let date: NaiveDate = row.get(0);
                let close: f64 = row.get(1);
                PricePoint { date, close }
            })
            .collect();

        Ok(PriceSeries::new(ticker, points))
    }

    fn tickers_with_data_on(&self, date: NaiveDate) -> Result<Vec<String>, ScreenError> {
        let query = "SELECT ticker FROM symbol
                     WHERE id IN
                       (SELECT DISTINCT(stock_id)
                        FROM daily_data
                        WHERE date_price = $1)
                     ORDER BY ticker";

        let rows = self
            .client
            .borrow_mut()
            .query(query, &[&date])
            .map_err(|e| ScreenError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        Ok(rows.into_iter().map(|row| row.get(0)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EmptyConfig;

    impl ConfigPort for EmptyConfig {
        fn get_string(&self, _section: &str, _key: &str) -> Option<String> {
            None
        }
        fn get_int(&self, _section: &str, _key: &str, default: i64) -> i64 {
            default
        }
        fn get_double(&self, _section: &str, _key: &str, default: f64) -> f64 {
            default
        }
    }

    #[test]
    fn from_config_missing_credentials() {
        match PostgresAdapter::from_config(&EmptyConfig) {
            Err(ScreenError::ConfigMissing { section, key }) => {
                assert_eq!(section, "database");
                assert_eq!(key, "host");
            }
            Err(other) => panic!("expected ConfigMissing, got: {other}"),
            Ok(_) => panic!("expected error, got Ok"),
        }
    }
}
