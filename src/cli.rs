//! CLI definition and dispatch.
//!
//! One subcommand per screen. Each screen loads config, resolves its ticker
//! universe (live query or a previously persisted list), runs one diagnostic
//! over the date window, writes the bucket files, and prints summary
//! statistics to stderr.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_sink_adapter::TextFileSink;
use crate::domain::error::ScreenError;
use crate::domain::half_life::DEFAULT_THRESHOLD;
use crate::domain::screen::{
    run_screen, Diagnostic, ScreenReport, ADF_PASSED_1PCT, ADF_PASSED_5PCT, HALF_LIFE_FAILED,
    HALF_LIFE_PASSED, HURST_MEAN_REVERTING,
};
use crate::domain::series::DateWindow;
use crate::domain::stationarity::DEFAULT_LAG_ORDER;
use crate::domain::summary::RunSummary;
use crate::domain::universe::load_ticker_file;
use crate::ports::config_port::ConfigPort;
use crate::ports::series_port::SeriesPort;
use crate::ports::sink_port::ResultSink;

#[derive(Parser, Debug)]
#[command(name = "mrscreen", about = "Mean-reversion screens for equity price series")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Screen the universe with the Augmented Dickey-Fuller test
    Adf {
        #[arg(short, long)]
        config: PathBuf,
        /// Lagged differences in the test regression (1 = daily)
        #[arg(long)]
        lag_order: Option<usize>,
    },
    /// Screen the universe with the Hurst exponent
    Hurst {
        #[arg(short, long)]
        config: PathBuf,
        /// Output file for the mean-reverting ticker list
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Screen a persisted ticker list by half-life of mean reversion
    HalfLife {
        #[arg(short, long)]
        config: PathBuf,
        /// Ticker file, one symbol per line (e.g. the hurst screen output)
        #[arg(short, long)]
        universe: PathBuf,
        /// Pass threshold in trading days
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// List tickers with data on a date (defaults to the window start)
    ListTickers {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        date: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Adf { config, lag_order } => run_adf(&config, lag_order),
        Command::Hurst { config, output } => run_hurst(&config, output.as_deref()),
        Command::HalfLife {
            config,
            universe,
            threshold,
        } => run_half_life(&config, &universe, threshold),
        Command::ListTickers { config, date } => run_list_tickers(&config, date.as_deref()),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = ScreenError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn parse_config_date(
    adapter: &dyn ConfigPort,
    key: &str,
) -> Result<NaiveDate, ScreenError> {
    let value = adapter
        .get_string("screen", key)
        .ok_or_else(|| ScreenError::ConfigMissing {
            section: "screen".into(),
            key: key.into(),
        })?;
    NaiveDate::parse_from_str(&value, "%Y-%m-%d").map_err(|_| ScreenError::ConfigInvalid {
        section: "screen".into(),
        key: key.into(),
        reason: "invalid date format (expected YYYY-MM-DD)".into(),
    })
}

pub fn build_window(adapter: &dyn ConfigPort) -> Result<DateWindow, ScreenError> {
    let start = parse_config_date(adapter, "start_date")?;
    let end = parse_config_date(adapter, "end_date")?;
    DateWindow::new(start, end)
}

/// Open the configured series source. A `[csv] path` takes priority (no
/// database needed); otherwise the feature-gated database adapters are
/// tried: `[database]` credentials for Postgres, `[sqlite] path` for SQLite.
pub fn open_series_port(
    adapter: &dyn ConfigPort,
) -> Result<Box<dyn SeriesPort>, ScreenError> {
    if let Some(path) = adapter.get_string("csv", "path") {
        return Ok(Box::new(CsvAdapter::new(PathBuf::from(path))));
    }

    #[cfg(feature = "postgres")]
    {
        use crate::adapters::postgres_adapter::PostgresAdapter;
        if adapter.get_string("database", "host").is_some() {
            return Ok(Box::new(PostgresAdapter::from_config(adapter)?));
        }
    }

    #[cfg(feature = "sqlite")]
    {
        use crate::adapters::sqlite_adapter::SqliteAdapter;
        if adapter.get_string("sqlite", "path").is_some() {
            return Ok(Box::new(SqliteAdapter::from_config(adapter)?));
        }
    }

    Err(ScreenError::ConfigMissing {
        section: "database".into(),
        key: "host".into(),
    })
}

/// Universe for the live screens: every ticker with data on the window start.
fn live_universe(
    port: &dyn SeriesPort,
    window: &DateWindow,
) -> Result<Vec<String>, ScreenError> {
    let tickers = port.tickers_with_data_on(window.start())?;
    eprintln!(
        "Screening {} tickers with data on {}",
        tickers.len(),
        window.start()
    );
    Ok(tickers)
}

fn print_summary(title: &str, summary: &RunSummary) {
    eprintln!("{title}");
    eprintln!("Total: {}", summary.count);
    eprintln!("Median: {:.6}", summary.median);
    eprintln!("Mean: {:.6}", summary.mean);
    eprintln!("Std. Dev: {:.6}", summary.std_dev);
}

fn report_failures(report: &ScreenReport) {
    if !report.failures.is_empty() {
        eprintln!("Skipped {} tickers with errors:", report.failures.len());
        for failure in &report.failures {
            eprintln!("  {}: {}", failure.ticker, failure.error);
        }
    }
}

fn write_bucket(
    sink: &dyn ResultSink,
    report: &ScreenReport,
    label: &str,
    path: &Path,
) -> Result<(), ScreenError> {
    sink.write_lines(path, report.tickers_in(label))?;
    eprintln!(
        "Wrote {} tickers to {}",
        report.tickers_in(label).len(),
        path.display()
    );
    Ok(())
}

fn output_path(adapter: &dyn ConfigPort, key: &str, default: &str) -> PathBuf {
    PathBuf::from(
        adapter
            .get_string("screen", key)
            .unwrap_or_else(|| default.to_string()),
    )
}

fn fail(err: ScreenError) -> ExitCode {
    eprintln!("error: {err}");
    (&err).into()
}

fn run_adf(config_path: &Path, lag_order_override: Option<usize>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let window = match build_window(&adapter) {
        Ok(w) => w,
        Err(e) => return fail(e),
    };

    let lag_order = lag_order_override
        .unwrap_or_else(|| adapter.get_int("screen", "adf_lag_order", DEFAULT_LAG_ORDER as i64) as usize);

    let port = match open_series_port(&adapter) {
        Ok(p) => p,
        Err(e) => return fail(e),
    };

    let tickers = match live_universe(port.as_ref(), &window) {
        Ok(t) => t,
        Err(e) => return fail(e),
    };

    let report = match run_screen(port.as_ref(), &tickers, &window, &Diagnostic::Adf { lag_order })
    {
        Ok(r) => r,
        Err(e) => return fail(e),
    };

    let sink = TextFileSink;
    let out_1 = output_path(&adapter, "adf_output_1pct", "mr_stocks_adf_1.txt");
    let out_5 = output_path(&adapter, "adf_output_5pct", "mr_stocks_adf_5.txt");
    if let Err(e) = write_bucket(&sink, &report, ADF_PASSED_1PCT, &out_1)
        .and_then(|()| write_bucket(&sink, &report, ADF_PASSED_5PCT, &out_5))
    {
        return fail(e);
    }

    print_summary("\n=== ADF statistic distribution ===", &report.summary);
    report_failures(&report);
    ExitCode::SUCCESS
}

fn run_hurst(config_path: &Path, output_override: Option<&Path>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let window = match build_window(&adapter) {
        Ok(w) => w,
        Err(e) => return fail(e),
    };

    let port = match open_series_port(&adapter) {
        Ok(p) => p,
        Err(e) => return fail(e),
    };

    let tickers = match live_universe(port.as_ref(), &window) {
        Ok(t) => t,
        Err(e) => return fail(e),
    };

    let report = match run_screen(port.as_ref(), &tickers, &window, &Diagnostic::Hurst) {
        Ok(r) => r,
        Err(e) => return fail(e),
    };

    // Default output carries the window end date, matching the file the
    // half-life screen expects to chain from.
    let default_name = format!("he_stock_list_{}.txt", window.end().format("%Y_%m_%d"));
    let out = output_override
        .map(Path::to_path_buf)
        .unwrap_or_else(|| output_path(&adapter, "hurst_output", &default_name));

    let sink = TextFileSink;
    if let Err(e) = write_bucket(&sink, &report, HURST_MEAN_REVERTING, &out) {
        return fail(e);
    }

    print_summary("\n=== HE distribution (all tickers) ===", &report.summary);
    if let Some(bucket) = report.bucket(HURST_MEAN_REVERTING) {
        print_summary(
            "\n=== HE distribution (mean-reverting) ===",
            &RunSummary::compute(&bucket.values),
        );
    }
    report_failures(&report);
    ExitCode::SUCCESS
}

fn run_half_life(
    config_path: &Path,
    universe_path: &Path,
    threshold_override: Option<f64>,
) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let window = match build_window(&adapter) {
        Ok(w) => w,
        Err(e) => return fail(e),
    };

    let threshold = threshold_override
        .unwrap_or_else(|| adapter.get_double("screen", "half_life_threshold", DEFAULT_THRESHOLD));

    let tickers = match load_ticker_file(universe_path) {
        Ok(t) => t,
        Err(e) => return fail(e),
    };
    eprintln!(
        "Screening {} tickers from {}",
        tickers.len(),
        universe_path.display()
    );

    let port = match open_series_port(&adapter) {
        Ok(p) => p,
        Err(e) => return fail(e),
    };

    let report = match run_screen(
        port.as_ref(),
        &tickers,
        &window,
        &Diagnostic::HalfLife { threshold },
    ) {
        Ok(r) => r,
        Err(e) => return fail(e),
    };

    let sink = TextFileSink;
    let out_passed = output_path(&adapter, "half_life_output_passed", "halfL_passed_tickers.txt");
    let out_failed = output_path(&adapter, "half_life_output_failed", "halfL_failed_tickers.txt");
    if let Err(e) = write_bucket(&sink, &report, HALF_LIFE_PASSED, &out_passed)
        .and_then(|()| write_bucket(&sink, &report, HALF_LIFE_FAILED, &out_failed))
    {
        return fail(e);
    }

    print_summary("\n=== Half-life distribution ===", &report.summary);
    report_failures(&report);
    ExitCode::SUCCESS
}

fn run_list_tickers(config_path: &Path, date_override: Option<&str>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let date = match date_override {
        Some(s) => match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            Ok(d) => d,
            Err(_) => {
                return fail(ScreenError::ConfigInvalid {
                    section: "cli".into(),
                    key: "date".into(),
                    reason: "invalid date format (expected YYYY-MM-DD)".into(),
                })
            }
        },
        None => match build_window(&adapter) {
            Ok(w) => w.start(),
            Err(e) => return fail(e),
        },
    };

    let port = match open_series_port(&adapter) {
        Ok(p) => p,
        Err(e) => return fail(e),
    };

    match port.tickers_with_data_on(date) {
        Ok(tickers) => {
            for ticker in tickers {
                println!("{ticker}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_window_parses_dates() {
        let adapter = FileConfigAdapter::from_string(
            "[screen]\nstart_date = 2004-12-30\nend_date = 2010-12-30\n",
        )
        .unwrap();
        let window = build_window(&adapter).unwrap();
        assert_eq!(window.start(), NaiveDate::from_ymd_opt(2004, 12, 30).unwrap());
        assert_eq!(window.end(), NaiveDate::from_ymd_opt(2010, 12, 30).unwrap());
    }

    #[test]
    fn build_window_missing_key() {
        let adapter =
            FileConfigAdapter::from_string("[screen]\nstart_date = 2004-12-30\n").unwrap();
        assert!(matches!(
            build_window(&adapter),
            Err(ScreenError::ConfigMissing { .. })
        ));
    }

    #[test]
    fn build_window_rejects_bad_format() {
        let adapter = FileConfigAdapter::from_string(
            "[screen]\nstart_date = 30/12/2004\nend_date = 2010-12-30\n",
        )
        .unwrap();
        assert!(matches!(
            build_window(&adapter),
            Err(ScreenError::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn build_window_rejects_inverted_range() {
        let adapter = FileConfigAdapter::from_string(
            "[screen]\nstart_date = 2010-12-30\nend_date = 2004-12-30\n",
        )
        .unwrap();
        assert!(matches!(
            build_window(&adapter),
            Err(ScreenError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn open_series_port_without_source_configured() {
        let adapter = FileConfigAdapter::from_string("[screen]\n").unwrap();
        assert!(matches!(
            open_series_port(&adapter),
            Err(ScreenError::ConfigMissing { .. })
        ));
    }

    #[test]
    fn open_series_port_prefers_csv() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = FileConfigAdapter::from_string(&format!(
            "[csv]\npath = {}\n",
            dir.path().display()
        ))
        .unwrap();
        assert!(open_series_port(&adapter).is_ok());
    }
}
