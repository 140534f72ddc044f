//! Ticker universe loaded from a previously persisted screen output.
//!
//! The Hurst screen writes one symbol per line; the half-life screen reads
//! that file back as its input universe.

use crate::domain::error::ScreenError;
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, thiserror::Error)]
pub enum UniverseError {
    #[error("empty ticker file")]
    Empty,

    #[error("duplicate ticker: {0}")]
    DuplicateTicker(String),
}

/// Parse a ticker list: one symbol per line, trimmed, blank lines skipped,
/// duplicates rejected. Order is preserved.
pub fn parse_ticker_lines(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut tickers = Vec::new();
    let mut seen = HashSet::new();

    for line in input.lines() {
        let ticker = line.trim();
        if ticker.is_empty() {
            continue;
        }
        if !seen.insert(ticker.to_string()) {
            return Err(UniverseError::DuplicateTicker(ticker.to_string()));
        }
        tickers.push(ticker.to_string());
    }

    if tickers.is_empty() {
        return Err(UniverseError::Empty);
    }

    Ok(tickers)
}

/// Load a ticker universe from a flat file.
pub fn load_ticker_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>, ScreenError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    parse_ticker_lines(&content).map_err(|e| ScreenError::ConfigInvalid {
        section: "universe".into(),
        key: path.as_ref().display().to_string(),
        reason: e.to_string(),
    })
}
