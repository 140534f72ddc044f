//! SQLite data adapter.
//!
//! Mirrors the securities-master layout: a `symbol` table keyed by id and a
//! `daily_data` table of (stock_id, date_price, adj_close_price) rows.

use crate::domain::error::ScreenError;
use crate::domain::series::{DateWindow, PricePoint, PriceSeries};
use crate::ports::config_port::ConfigPort;
use crate::ports::series_port::SeriesPort;
use chrono::NaiveDate;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

pub struct SqliteAdapter {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, ScreenError> {
        let db_path =
            config
                .get_string("sqlite", "path")
                .ok_or_else(|| ScreenError::ConfigMissing {
                    section: "sqlite".into(),
                    key: "path".into(),
                })?;

        let pool_size = config.get_int("sqlite", "pool_size", 4) as u32;

        let manager = SqliteConnectionManager::file(&db_path);
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .map_err(|e: r2d2::Error| ScreenError::Database {
                reason: e.to_string(),
            })?;

        Ok(Self { pool })
    }

    pub fn in_memory() -> Result<Self, ScreenError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e: r2d2::Error| ScreenError::Database {
                reason: e.to_string(),
            })?;

        Ok(Self { pool })
    }

    pub fn initialize_schema(&self) -> Result<(), ScreenError> {
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| ScreenError::Database {
                reason: e.to_string(),
            })?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS symbol (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                ticker TEXT NOT NULL UNIQUE
            );
            CREATE TABLE IF NOT EXISTS daily_data (
                stock_id INTEGER NOT NULL REFERENCES symbol(id),
                date_price TEXT NOT NULL,
                adj_close_price REAL NOT NULL,
                PRIMARY KEY (stock_id, date_price)
            );
            CREATE INDEX IF NOT EXISTS idx_daily_data_date ON daily_data(date_price);",
        )
        .map_err(|e: rusqlite::Error| ScreenError::DatabaseQuery {
            reason: e.to_string(),
        })?;

        Ok(())
    }

    /// Insert a ticker's price history, creating the symbol row on demand.
    pub fn insert_prices(&self, ticker: &str, points: &[PricePoint]) -> Result<(), ScreenError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| ScreenError::Database {
                reason: e.to_string(),
            })?;

        let tx = conn
            .transaction()
            .map_err(|e: rusqlite::Error| ScreenError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        tx.execute(
            "INSERT OR IGNORE INTO symbol (ticker) VALUES (?1)",
            params![ticker],
        )
        .map_err(|e: rusqlite::Error| ScreenError::DatabaseQuery {
            reason: e.to_string(),
        })?;

        let stock_id: i64 = tx
            .query_row(
                "SELECT id FROM symbol WHERE ticker = ?1",
                params![ticker],
                |row| row.get(0),
            )
            .map_err(|e: rusqlite::Error| ScreenError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        for point in points {
            tx.execute(
                "INSERT OR REPLACE INTO daily_data (stock_id, date_price, adj_close_price)
                 VALUES (?1, ?2, ?3)",
                params![
                    stock_id,
                    point.date.format("%Y-%m-%d").to_string(),
                    point.close
                ],
            )
            .map_err(|e: rusqlite::Error| ScreenError::DatabaseQuery {
                reason: e.to_string(),
            })?;
        }

        tx.commit()
            .map_err(|e: rusqlite::Error| ScreenError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        Ok(())
    }
}

impl SeriesPort for SqliteAdapter {
    fn fetch_series(
        &self,
        ticker: &str,
        window: &DateWindow,
    ) -> Result<PriceSeries, ScreenError> {
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| ScreenError::Database {
                reason: e.to_string(),
            })?;

        let start = window.start().format("%Y-%m-%d").to_string();
        let end = window.end().format("%Y-%m-%d").to_string();

        let query = "SELECT date_price, adj_close_price
                     FROM daily_data
                     INNER JOIN symbol ON symbol.id = daily_data.stock_id
                     WHERE symbol.ticker = ?1 AND date_price >= ?2 AND date_price <= ?3
                     ORDER BY date_price ASC";

        let mut stmt = conn
            .prepare(query)
            .map_err(|e: rusqlite::Error| ScreenError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        let rows = stmt
            .query_map(params![ticker, start, end], |row| {
                let date_str: String = row.get(0)?;
                let close: f64 = row.get(1)?;
                Ok((date_str, close))
            })
            .map_err(|e: rusqlite::Error| ScreenError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        let mut points = Vec::new();
        for row in rows {
            let (date_str, close) =
                row.map_err(|e: rusqlite::Error| ScreenError::DatabaseQuery {
                    reason: e.to_string(),
                })?;
            let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
                ScreenError::DatabaseQuery {
                    reason: format!("invalid date_price '{date_str}': {e}"),
                }
            })?;
            points.push(PricePoint { date, close });
        }

        Ok(PriceSeries::new(ticker, points))
    }

    fn tickers_with_data_on(&self, date: NaiveDate) -> Result<Vec<String>, ScreenError> {
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| ScreenError::Database {
                reason: e.to_string(),
            })?;

        let query = "SELECT ticker FROM symbol
                     WHERE id IN
                       (SELECT DISTINCT stock_id
                        FROM daily_data
                        WHERE date_price = ?1)
                     ORDER BY ticker";

        let mut stmt = conn
            .prepare(query)
            .map_err(|e: rusqlite::Error| ScreenError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        let rows = stmt
            .query_map(params![date.format("%Y-%m-%d").to_string()], |row| {
                row.get::<_, String>(0)
            })
            .map_err(|e: rusqlite::Error| ScreenError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        let mut tickers = Vec::new();
        for row in rows {
            tickers.push(row.map_err(|e: rusqlite::Error| ScreenError::DatabaseQuery {
                reason: e.to_string(),
            })?);
        }

        Ok(tickers)
    }
}
